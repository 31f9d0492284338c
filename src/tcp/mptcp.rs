//! Multipath-TCP option extraction.
//!
//! These queries look for the multipath option at a fixed position in the
//! options region: kind byte at options offset 20, subtype byte at 22,
//! key/token starting at 24. That matches peers which place the multipath
//! option after exactly 20 bytes of preceding options; a general
//! type-length-value walk over the options chain is deliberately not
//! attempted. Out-of-range lookups return `false`/`None`.

use super::header::TcpHeader;

/// Option kind byte that marks the multipath extension.
pub const MPTCP_OPTION_KIND: u8 = 0x1e;

const KIND_OFFSET: usize = 20;
const SUBTYPE_OFFSET: usize = 22;
const PAYLOAD_OFFSET: usize = 24;

/// Subtype carried in a multipath option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MptcpSubtype {
    /// Capability negotiation (`MP_CAPABLE`, subtype byte `0x00`).
    Capable,
    /// Joining an existing connection (`MP_JOIN`, subtype byte `0x10`).
    Join,
}

impl TcpHeader {
    /// Whether the options region carries the multipath option at its
    /// expected position.
    pub fn is_mptcp_enabled(&self) -> bool {
        match self.options() {
            Some(options) => options.get(KIND_OFFSET) == Some(&MPTCP_OPTION_KIND),
            None => false,
        }
    }

    /// The multipath subtype, or `None` when the byte is absent or names
    /// a subtype this codec does not know.
    ///
    /// The subtype byte is inspected without re-checking
    /// [`is_mptcp_enabled`](Self::is_mptcp_enabled); callers confirm
    /// presence first.
    pub fn mptcp_subtype(&self) -> Option<MptcpSubtype> {
        match self.options()?.get(SUBTYPE_OFFSET)? {
            0x00 => Some(MptcpSubtype::Capable),
            0x10 => Some(MptcpSubtype::Join),
            _ => None,
        }
    }

    /// The 8-byte sender key of an `MP_CAPABLE` option.
    ///
    /// Meaningful only when [`mptcp_subtype`](Self::mptcp_subtype) is
    /// [`MptcpSubtype::Capable`]; `None` when the options region is too
    /// short to hold the key.
    pub fn mptcp_sender_key(&self) -> Option<[u8; 8]> {
        let key = self.options()?.get(PAYLOAD_OFFSET..PAYLOAD_OFFSET + 8)?;
        key.try_into().ok()
    }

    /// The 4-byte token of an `MP_JOIN` option.
    ///
    /// Meaningful only when [`mptcp_subtype`](Self::mptcp_subtype) is
    /// [`MptcpSubtype::Join`]; `None` when the options region is too
    /// short to hold the token.
    pub fn mptcp_token(&self) -> Option<[u8; 4]> {
        let token = self.options()?.get(PAYLOAD_OFFSET..PAYLOAD_OFFSET + 4)?;
        token.try_into().ok()
    }
}
