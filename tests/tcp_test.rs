use bytes::Bytes;

use tcpkt::ipv4::{IpProtocol, Ipv4Addr, NetworkParent, PseudoHeader};
use tcpkt::tcp::*;
use tcpkt::Error;

struct Ipv4Stub {
    source_addr: Ipv4Addr,
    dest_addr: Ipv4Addr,
    protocol: IpProtocol,
}

impl NetworkParent for Ipv4Stub {
    fn source_addr(&self) -> Ipv4Addr {
        self.source_addr
    }
    fn dest_addr(&self) -> Ipv4Addr {
        self.dest_addr
    }
    fn protocol(&self) -> IpProtocol {
        self.protocol
    }
    fn set_protocol(&mut self, protocol: IpProtocol) {
        self.protocol = protocol;
    }
}

// A SYN segment with a 4-byte MSS option, 24 bytes total.
static SYN_BYTES: [u8; 24] = [
    0xc3, 0x50, 0x00, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x02, 0x72,
    0x10, 0x1c, 0x46, 0x00, 0x00, 0x02, 0x04, 0x05, 0xb4,
];

#[test]
fn parse_syn_with_mss_option() {
    let header = TcpHeader::deserialize(&SYN_BYTES[..]).unwrap();

    assert_eq!(header.src_port(), 50000);
    assert_eq!(header.dst_port(), 80);
    assert_eq!(header.seq_num(), 0);
    assert_eq!(header.ack_num(), 0);
    assert_eq!(header.header_len_words(), 6);
    assert!(header.syn());
    assert!(!header.ack());
    assert_eq!(header.window_size(), 29200);
    assert_eq!(header.checksum(), Checksum::Supplied(0x1c46));
    assert_eq!(header.options(), Some(&[0x02, 0x04, 0x05, 0xb4][..]));
    assert_eq!(header.payload(), None);
    assert!(!header.is_mptcp_enabled());
}

#[test]
fn rebuild_syn_byte_for_byte() {
    let mut header = TcpHeader::deserialize(&SYN_BYTES[..]).unwrap();
    let data = header.serialize(None);
    assert_eq!(&data[..], &SYN_BYTES[..]);
}

#[test]
fn build_checksum_and_parse_mptcp_capable() {
    let mut parent = Ipv4Stub {
        source_addr: Ipv4Addr::new(192, 168, 1, 10),
        dest_addr: Ipv4Addr::new(192, 168, 1, 20),
        protocol: IpProtocol::UDP,
    };

    let sender_key = [0x10, 0x32, 0x54, 0x76, 0x98, 0xba, 0xdc, 0xfe];
    let mut options = vec![0x01; 20];
    options.extend_from_slice(&[MPTCP_OPTION_KIND, 0x0c, 0x00, 0x00]);
    options.extend_from_slice(&sender_key);

    let mut header = TcpHeader::new();
    header
        .set_src_port(33000)
        .set_dst_port(443)
        .set_seq_num(0x0102_0304)
        .set_syn(true)
        .set_window_size(65535);
    header.set_options(options).unwrap();
    header.set_payload(Bytes::from_static(b"greetings"));

    let wire = header.serialize(Some(&mut parent));
    assert_eq!(wire.len(), 52 + 9);
    assert_eq!(parent.protocol, IpProtocol::TCP);

    let phdr = PseudoHeader::from_parent(&parent, wire.len() as u16);
    assert!(TcpHeader::verify_checksum(&wire, &phdr));

    let decoded = TcpHeader::deserialize(&wire).unwrap();
    assert_eq!(decoded.header_len_words(), 13);
    assert!(decoded.is_mptcp_enabled());
    assert_eq!(decoded.mptcp_subtype(), Some(MptcpSubtype::Capable));
    assert_eq!(decoded.mptcp_sender_key(), Some(sender_key));
    assert_eq!(decoded.payload().unwrap().as_ref(), b"greetings");
    assert_eq!(decoded.checksum().value(), header.checksum().value());
}

#[test]
fn corrupted_wire_fails_verification() {
    let mut parent = Ipv4Stub {
        source_addr: Ipv4Addr::new(192, 168, 1, 10),
        dest_addr: Ipv4Addr::new(192, 168, 1, 20),
        protocol: IpProtocol::TCP,
    };

    let mut header = TcpHeader::new();
    header.set_src_port(1).set_dst_port(2);
    let mut wire = header.serialize(Some(&mut parent));

    let phdr = PseudoHeader::from_parent(&parent, wire.len() as u16);
    assert!(TcpHeader::verify_checksum(&wire, &phdr));

    wire[14] ^= 0x01;
    assert!(!TcpHeader::verify_checksum(&wire, &phdr));
}

#[test]
fn undersized_length_nibble_is_fatal() {
    let mut data = SYN_BYTES;
    data[12] = 0x30;
    assert_eq!(
        TcpHeader::deserialize(&data[..]),
        Err(Error::HeaderTooShort { header_len: 3 })
    );
}
