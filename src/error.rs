use thiserror::Error;

/// Errors produced while building or decoding a TCP header.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The length nibble of a decoded header claims fewer than the
    /// mandatory 5 words (20 bytes).
    #[error("tcp header length {header_len} words is below the 5 word minimum")]
    HeaderTooShort {
        /// The declared header length, in 4-byte words.
        header_len: u8,
    },

    /// The supplied buffer cannot hold even the 20-byte fixed header.
    #[error("buffer of {available} bytes cannot hold a 20 byte tcp header")]
    TruncatedHeader {
        /// Number of bytes that were available.
        available: usize,
    },

    /// The options region would push the header past the 60-byte limit
    /// encodable in the 4-bit length field.
    #[error("{len} option bytes exceed the 40 byte tcp options limit")]
    OptionsTooLong {
        /// Length of the rejected options, in bytes.
        len: usize,
    },
}
