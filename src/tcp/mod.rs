//! TCP header codec.
//!
//! [`TcpHeader`] is an owned record of every TCP header field together
//! with an optional options region and an optional opaque payload. It
//! serializes into the 20-to-60 byte big-endian wire layout (options are
//! zero padded to the 4-byte word boundary) and decodes the same layout
//! back, tolerating truncated options. Checksums use the IPv4
//! pseudo-header supplied through [`crate::ipv4::NetworkParent`].

mod header;
pub use header::{Checksum, TcpHeader};
pub use header::{TCP_HEADER_LEN, TCP_HEADER_LEN_MAX, TCP_OPTIONS_LEN_MAX};

mod mptcp;
pub use mptcp::{MptcpSubtype, MPTCP_OPTION_KIND};

/// Control flag bits of the 9-bit flags field.
pub mod flags {
    /// No more data from sender.
    pub const FIN: u16 = 0x001;
    /// Synchronize sequence numbers.
    pub const SYN: u16 = 0x002;
    /// Reset the connection.
    pub const RST: u16 = 0x004;
    /// Push buffered data to the application.
    pub const PSH: u16 = 0x008;
    /// Acknowledgment field is significant.
    pub const ACK: u16 = 0x010;
    /// Urgent pointer field is significant.
    pub const URG: u16 = 0x020;
    /// ECN echo.
    pub const ECE: u16 = 0x040;
    /// Congestion window reduced.
    pub const CWR: u16 = 0x080;
    /// ECN nonce (experimental).
    pub const NS: u16 = 0x100;
}
