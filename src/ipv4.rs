//! The network-layer surface the TCP codec interacts with.
//!
//! A TCP header does not hold a reference to its enclosing IPv4 header.
//! Instead, the enclosing layer implements [`NetworkParent`] and is handed
//! to [`serialize`](crate::tcp::TcpHeader::serialize) by the caller; the
//! codec reads the addresses and protocol number from it to build the
//! checksum [`PseudoHeader`], and writes the TCP protocol number back so
//! the parent's own framing stays consistent.

pub use std::net::Ipv4Addr;

use crate::checksum_utils;

/// An enum-like type for representing different protocols carried in IPv4.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct IpProtocol(u8);

impl IpProtocol {
    /// IP packet payload is ICMP protocol.
    pub const ICMP: Self = Self(1);

    /// IP packet payload is TCP protocol.
    pub const TCP: Self = Self(6);

    /// IP packet payload is UDP protocol.
    pub const UDP: Self = Self(17);

    /// Get the raw value.
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl From<u8> for IpProtocol {
    #[inline]
    fn from(value: u8) -> IpProtocol {
        IpProtocol(value)
    }
}

impl From<IpProtocol> for u8 {
    #[inline]
    fn from(value: IpProtocol) -> u8 {
        value.0
    }
}

/// The enclosing network-layer header, as seen by the TCP codec.
pub trait NetworkParent {
    /// Source address of the enclosing header.
    fn source_addr(&self) -> Ipv4Addr;

    /// Destination address of the enclosing header.
    fn dest_addr(&self) -> Ipv4Addr;

    /// Protocol number recorded in the enclosing header.
    fn protocol(&self) -> IpProtocol;

    /// Record the protocol number of the carried payload.
    fn set_protocol(&mut self, protocol: IpProtocol);
}

/// The virtual header fields that feed the TCP checksum but are never
/// transmitted as part of the TCP header itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoHeader {
    /// Network-layer source address.
    pub source_addr: Ipv4Addr,
    /// Network-layer destination address.
    pub dest_addr: Ipv4Addr,
    /// Protocol number of the transport payload.
    pub protocol: IpProtocol,
    /// Length of the transport header plus payload, in bytes.
    pub packet_len: u16,
}

impl PseudoHeader {
    /// Build the pseudo-header from a network parent and a packet length.
    pub fn from_parent(parent: &dyn NetworkParent, packet_len: u16) -> Self {
        PseudoHeader {
            source_addr: parent.source_addr(),
            dest_addr: parent.dest_addr(),
            protocol: parent.protocol(),
            packet_len,
        }
    }

    /// The pseudo-header's contribution to the checksum, without the
    /// final complement.
    pub fn calc_checksum(&self) -> u16 {
        let src = u32::from(self.source_addr);
        let dst = u32::from(self.dest_addr);

        let accum = ((src >> 16) & 0xffff)
            + (src & 0xffff)
            + ((dst >> 16) & 0xffff)
            + (dst & 0xffff)
            + u32::from(self.protocol.raw())
            + u32::from(self.packet_len);

        checksum_utils::combine(&[(accum >> 16) as u16, accum as u16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_header_sums_address_halves() {
        let phdr = PseudoHeader {
            source_addr: Ipv4Addr::new(10, 0, 0, 1),
            dest_addr: Ipv4Addr::new(10, 0, 0, 2),
            protocol: IpProtocol::TCP,
            packet_len: 20,
        };

        // 0x0a00 + 0x0001 + 0x0a00 + 0x0002 + 6 + 20
        assert_eq!(phdr.calc_checksum(), 0x0a00 + 0x0001 + 0x0a00 + 0x0002 + 6 + 20);
    }

    #[test]
    fn protocol_raw_round_trip() {
        assert_eq!(IpProtocol::TCP.raw(), 6);
        assert_eq!(IpProtocol::from(17), IpProtocol::UDP);
        assert_eq!(u8::from(IpProtocol::ICMP), 1);
    }
}
