use byteorder::{ByteOrder, NetworkEndian};
use bytes::Bytes;

use crate::checksum_utils;
use crate::ipv4::{IpProtocol, NetworkParent, PseudoHeader};
use crate::Error;

/// A constant that defines the fixed byte length of the TCP header.
pub const TCP_HEADER_LEN: usize = 20;

/// Maximum length of the TCP header with options.
pub const TCP_HEADER_LEN_MAX: usize = 60;

/// Maximum length of the options region.
pub const TCP_OPTIONS_LEN_MAX: usize = TCP_HEADER_LEN_MAX - TCP_HEADER_LEN;

const CHECKSUM_OFFSET: usize = 16;
const FLAGS_MASK: u16 = 0x01ff;

/// State of the checksum field.
///
/// Using a zero checksum to mean "compute me" is ambiguous, since zero is
/// a representable checksum; the three states here keep the two cases
/// apart, so a genuine zero supplied by the caller is written to the wire
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Checksum {
    /// No checksum yet; [`TcpHeader::serialize`] will compute one.
    #[default]
    Unset,
    /// Caller- or wire-provided value, trusted as-is.
    Supplied(u16),
    /// Value produced by a previous serialization.
    Computed(u16),
}

impl Checksum {
    /// The 16-bit value, if one is present.
    #[inline]
    pub fn value(&self) -> Option<u16> {
        match *self {
            Checksum::Unset => None,
            Checksum::Supplied(value) | Checksum::Computed(value) => Some(value),
        }
    }

    // What goes into the checksum field before computation runs.
    #[inline]
    fn wire_value(&self) -> u16 {
        self.value().unwrap_or(0)
    }
}

/// An owned record of the TCP header fields.
///
/// A record is built field by field through the chained setters and turned
/// into wire bytes with [`serialize`](Self::serialize), or populated from
/// wire bytes with [`deserialize`](Self::deserialize). The record owns at
/// most one opaque payload, carried verbatim after the header.
#[derive(Debug, Clone, Default)]
pub struct TcpHeader {
    src_port: u16,
    dst_port: u16,
    seq_num: u32,
    ack_num: u32,
    header_len_words: u8,
    flags: u16,
    window_size: u16,
    checksum: Checksum,
    urgent_pointer: u16,
    options: Option<Vec<u8>>,
    payload: Option<Bytes>,
}

impl TcpHeader {
    /// Create an empty record with every field zeroed and the checksum
    /// unset.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source port.
    #[inline]
    pub fn src_port(&self) -> u16 {
        self.src_port
    }

    /// Set the source port.
    #[inline]
    pub fn set_src_port(&mut self, value: u16) -> &mut Self {
        self.src_port = value;
        self
    }

    /// Destination port.
    #[inline]
    pub fn dst_port(&self) -> u16 {
        self.dst_port
    }

    /// Set the destination port.
    #[inline]
    pub fn set_dst_port(&mut self, value: u16) -> &mut Self {
        self.dst_port = value;
        self
    }

    /// Sequence number. Wraps modulo 2^32 like every TCP counter.
    #[inline]
    pub fn seq_num(&self) -> u32 {
        self.seq_num
    }

    /// Set the sequence number.
    #[inline]
    pub fn set_seq_num(&mut self, value: u32) -> &mut Self {
        self.seq_num = value;
        self
    }

    /// Acknowledgment number.
    #[inline]
    pub fn ack_num(&self) -> u32 {
        self.ack_num
    }

    /// Set the acknowledgment number.
    #[inline]
    pub fn set_ack_num(&mut self, value: u32) -> &mut Self {
        self.ack_num = value;
        self
    }

    /// Header length in 4-byte words, 5 for the bare 20-byte header.
    ///
    /// Zero means "not yet derived"; serialization defaults it to 5.
    #[inline]
    pub fn header_len_words(&self) -> u8 {
        self.header_len_words
    }

    /// Set the header length in 4-byte words. Values above 15 do not fit
    /// the nibble.
    #[inline]
    pub fn set_header_len_words(&mut self, value: u8) -> &mut Self {
        assert!(value <= 0xf);
        self.header_len_words = value;
        self
    }

    /// Header length in bytes, options included.
    #[inline]
    pub fn header_len(&self) -> u8 {
        self.header_len_words * 4
    }

    /// The raw control flags. Only the low 9 bits are ever set.
    #[inline]
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Set the raw control flags. Bits above position 8 are discarded so
    /// the value can never bleed into the length nibble on the wire.
    #[inline]
    pub fn set_flags(&mut self, value: u16) -> &mut Self {
        self.flags = value & FLAGS_MASK;
        self
    }

    /// Receive window size.
    #[inline]
    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    /// Set the receive window size.
    #[inline]
    pub fn set_window_size(&mut self, value: u16) -> &mut Self {
        self.window_size = value;
        self
    }

    /// Current state of the checksum field.
    #[inline]
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Supply a checksum value. Serialization will trust it and skip
    /// computation.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) -> &mut Self {
        self.checksum = Checksum::Supplied(value);
        self
    }

    /// Discard any stored checksum so the next serialization recomputes it.
    #[inline]
    pub fn reset_checksum(&mut self) -> &mut Self {
        self.checksum = Checksum::Unset;
        self
    }

    /// Urgent pointer.
    #[inline]
    pub fn urgent_pointer(&self) -> u16 {
        self.urgent_pointer
    }

    /// Set the urgent pointer.
    #[inline]
    pub fn set_urgent_pointer(&mut self, value: u16) -> &mut Self {
        self.urgent_pointer = value;
        self
    }

    /// The options region, without padding. `None` for an optionless
    /// header.
    #[inline]
    pub fn options(&self) -> Option<&[u8]> {
        self.options.as_deref()
    }

    /// Install the options region and rederive the header length as
    /// `(20 + len + 3) >> 2` words.
    ///
    /// Options longer than 40 bytes cannot be represented in the 4-bit
    /// length field and are rejected.
    pub fn set_options(&mut self, options: Vec<u8>) -> Result<&mut Self, Error> {
        if options.len() > TCP_OPTIONS_LEN_MAX {
            return Err(Error::OptionsTooLong { len: options.len() });
        }
        self.header_len_words = ((TCP_HEADER_LEN + options.len() + 3) >> 2) as u8;
        self.options = if options.is_empty() {
            None
        } else {
            Some(options)
        };
        Ok(self)
    }

    /// The owned payload, if any.
    #[inline]
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Attach an opaque payload, carried verbatim after the header.
    #[inline]
    pub fn set_payload(&mut self, payload: Bytes) -> &mut Self {
        self.payload = Some(payload);
        self
    }

    /// Serialize the header and its payload into wire bytes.
    ///
    /// A zero header length defaults to 5 words. When a network parent is
    /// given, the TCP protocol number is written back into it, and its
    /// addresses feed the pseudo-header part of the checksum. The checksum
    /// is computed only when the field is [`Checksum::Unset`]; a supplied
    /// value is emitted untouched. The computed value is patched into the
    /// output and recorded on the header as [`Checksum::Computed`].
    pub fn serialize(&mut self, mut parent: Option<&mut dyn NetworkParent>) -> Vec<u8> {
        if self.header_len_words == 0 {
            self.header_len_words = 5;
        }
        let header_len = usize::from(self.header_len_words) * 4;
        let payload = self.payload.clone().unwrap_or_else(Bytes::new);
        let total_len = header_len + payload.len();

        let mut data = vec![0; total_len];
        NetworkEndian::write_u16(&mut data[0..2], self.src_port);
        NetworkEndian::write_u16(&mut data[2..4], self.dst_port);
        NetworkEndian::write_u32(&mut data[4..8], self.seq_num);
        NetworkEndian::write_u32(&mut data[8..12], self.ack_num);
        NetworkEndian::write_u16(
            &mut data[12..14],
            self.flags | (u16::from(self.header_len_words) << 12),
        );
        NetworkEndian::write_u16(&mut data[14..16], self.window_size);
        NetworkEndian::write_u16(&mut data[16..18], self.checksum.wire_value());
        NetworkEndian::write_u16(&mut data[18..20], self.urgent_pointer);
        if header_len > TCP_HEADER_LEN {
            if let Some(options) = &self.options {
                // trailing bytes up to the 4-byte boundary stay zero
                let copy_len = options.len().min(header_len - TCP_HEADER_LEN);
                data[TCP_HEADER_LEN..TCP_HEADER_LEN + copy_len]
                    .copy_from_slice(&options[..copy_len]);
            }
        }
        data[header_len..].copy_from_slice(&payload);

        if let Some(parent) = parent.as_deref_mut() {
            parent.set_protocol(IpProtocol::TCP);
        }

        if self.checksum == Checksum::Unset {
            let body_sum = checksum_utils::from_slice(&data);
            let folded = match parent {
                Some(parent) => {
                    let phdr = PseudoHeader::from_parent(parent, total_len as u16);
                    checksum_utils::combine(&[phdr.calc_checksum(), body_sum])
                }
                None => body_sum,
            };
            let checksum = !folded;
            NetworkEndian::write_u16(&mut data[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2], checksum);
            self.checksum = Checksum::Computed(checksum);
        }

        data
    }

    /// Deserialize a header from wire bytes.
    ///
    /// Fails with [`Error::TruncatedHeader`] when the buffer cannot hold
    /// the 20-byte fixed header, and with [`Error::HeaderTooShort`] when
    /// the length nibble claims fewer than 5 words. An options region
    /// longer than the remaining buffer is clamped to what is available
    /// rather than rejected. Bytes past the options become the payload.
    /// The wire checksum is stored as [`Checksum::Supplied`] and is not
    /// verified; see [`verify_checksum`](Self::verify_checksum).
    pub fn deserialize(data: &[u8]) -> Result<TcpHeader, Error> {
        if data.len() < TCP_HEADER_LEN {
            return Err(Error::TruncatedHeader {
                available: data.len(),
            });
        }

        let mut header = TcpHeader::new();
        header.src_port = NetworkEndian::read_u16(&data[0..2]);
        header.dst_port = NetworkEndian::read_u16(&data[2..4]);
        header.seq_num = NetworkEndian::read_u32(&data[4..8]);
        header.ack_num = NetworkEndian::read_u32(&data[8..12]);

        let len_flags = NetworkEndian::read_u16(&data[12..14]);
        header.header_len_words = (len_flags >> 12) as u8;
        if header.header_len_words < 5 {
            return Err(Error::HeaderTooShort {
                header_len: header.header_len_words,
            });
        }
        // bits 11..9 are reserved and dropped
        header.flags = len_flags & FLAGS_MASK;

        header.window_size = NetworkEndian::read_u16(&data[14..16]);
        header.checksum = Checksum::Supplied(NetworkEndian::read_u16(&data[16..18]));
        header.urgent_pointer = NetworkEndian::read_u16(&data[18..20]);

        let mut consumed = TCP_HEADER_LEN;
        if header.header_len_words > 5 {
            let declared = usize::from(header.header_len_words) * 4 - TCP_HEADER_LEN;
            let opt_len = declared.min(data.len() - TCP_HEADER_LEN);
            header.options = Some(data[TCP_HEADER_LEN..TCP_HEADER_LEN + opt_len].to_vec());
            consumed += opt_len;
        }

        if consumed < data.len() {
            header.payload = Some(Bytes::copy_from_slice(&data[consumed..]));
        }

        Ok(header)
    }

    /// Re-run the checksum over serialized wire bytes and report whether
    /// the embedded checksum is consistent.
    pub fn verify_checksum(data: &[u8], phdr: &PseudoHeader) -> bool {
        let sum =
            checksum_utils::combine(&[phdr.calc_checksum(), checksum_utils::from_slice(data)]);
        sum == !0
    }
}

impl PartialEq for TcpHeader {
    fn eq(&self, other: &Self) -> bool {
        self.src_port == other.src_port
            && self.dst_port == other.dst_port
            && self.seq_num == other.seq_num
            && self.ack_num == other.ack_num
            && self.header_len_words == other.header_len_words
            && self.flags == other.flags
            && self.window_size == other.window_size
            && self.checksum == other.checksum
            && self.urgent_pointer == other.urgent_pointer
            && self.payload == other.payload
            // an optionless header compares equal regardless of what the
            // options field holds
            && (self.header_len_words == 5 || self.options == other.options)
    }
}

impl Eq for TcpHeader {}

// Per-flag accessors over the 9-bit control field.
impl TcpHeader {
    #[inline]
    fn flag(&self, mask: u16) -> bool {
        self.flags & mask != 0
    }

    #[inline]
    fn set_flag(&mut self, mask: u16, value: bool) -> &mut Self {
        if value {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
        self
    }

    /// FIN flag.
    #[inline]
    pub fn fin(&self) -> bool {
        self.flag(super::flags::FIN)
    }

    /// Set the FIN flag.
    #[inline]
    pub fn set_fin(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::FIN, value)
    }

    /// SYN flag.
    #[inline]
    pub fn syn(&self) -> bool {
        self.flag(super::flags::SYN)
    }

    /// Set the SYN flag.
    #[inline]
    pub fn set_syn(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::SYN, value)
    }

    /// RST flag.
    #[inline]
    pub fn rst(&self) -> bool {
        self.flag(super::flags::RST)
    }

    /// Set the RST flag.
    #[inline]
    pub fn set_rst(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::RST, value)
    }

    /// PSH flag.
    #[inline]
    pub fn psh(&self) -> bool {
        self.flag(super::flags::PSH)
    }

    /// Set the PSH flag.
    #[inline]
    pub fn set_psh(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::PSH, value)
    }

    /// ACK flag.
    #[inline]
    pub fn ack(&self) -> bool {
        self.flag(super::flags::ACK)
    }

    /// Set the ACK flag.
    #[inline]
    pub fn set_ack(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::ACK, value)
    }

    /// URG flag.
    #[inline]
    pub fn urg(&self) -> bool {
        self.flag(super::flags::URG)
    }

    /// Set the URG flag.
    #[inline]
    pub fn set_urg(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::URG, value)
    }

    /// ECE flag.
    #[inline]
    pub fn ece(&self) -> bool {
        self.flag(super::flags::ECE)
    }

    /// Set the ECE flag.
    #[inline]
    pub fn set_ece(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::ECE, value)
    }

    /// CWR flag.
    #[inline]
    pub fn cwr(&self) -> bool {
        self.flag(super::flags::CWR)
    }

    /// Set the CWR flag.
    #[inline]
    pub fn set_cwr(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::CWR, value)
    }

    /// NS flag.
    #[inline]
    pub fn ns(&self) -> bool {
        self.flag(super::flags::NS)
    }

    /// Set the NS flag.
    #[inline]
    pub fn set_ns(&mut self, value: bool) -> &mut Self {
        self.set_flag(super::flags::NS, value)
    }
}
