//! Overlay message header
//!
//! Every message starts with the same 16-byte header. Multi-byte fields are
//! big-endian on the wire and host-native in memory.

use super::{DEFAULT_TTL, FormatError, HEADER_SIZE, MessageType, PROTOCOL_VERSION};

/// Overlay message header (16 bytes on the wire)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    Version    |      TTL      |  Message Type |   Reserved    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Origin Port           |          Body Length          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Origin IPv4 (4)                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Message ID (4)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The reserved byte is always written as zero and ignored when parsing,
/// so it has no in-memory representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    version: u8,
    ttl: u8,
    msg_type: u8,
    org_port: u16,
    length: u16,
    org_ip: u32,
    msg_id: u32,
}

impl MessageHeader {
    /// Create a header with the default version and TTL and an empty body
    #[must_use]
    pub const fn new(msg_type: MessageType, org_ip: u32, org_port: u16, msg_id: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            ttl: DEFAULT_TTL,
            msg_type: msg_type.as_u8(),
            org_port,
            length: 0,
            org_ip,
            msg_id,
        }
    }

    /// Replace the protocol version
    #[must_use]
    pub const fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Replace the message type
    #[must_use]
    pub const fn with_message_type(mut self, msg_type: MessageType) -> Self {
        self.msg_type = msg_type.as_u8();
        self
    }

    /// Replace the time-to-live
    #[must_use]
    pub const fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the declared body length
    #[must_use]
    pub const fn with_length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    /// Get protocol version
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Get time-to-live
    #[must_use]
    pub const fn ttl(&self) -> u8 {
        self.ttl
    }

    /// Get message type byte
    #[must_use]
    pub const fn msg_type_byte(&self) -> u8 {
        self.msg_type
    }

    /// Get message type, `None` for type bytes this crate does not know
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u8(self.msg_type)
    }

    /// Get origin port
    #[must_use]
    pub const fn org_port(&self) -> u16 {
        self.org_port
    }

    /// Get declared body length
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.length
    }

    /// Get origin IPv4 address as a host-order integer
    #[must_use]
    pub const fn org_ip(&self) -> u32 {
        self.org_ip
    }

    /// Get message ID
    #[must_use]
    pub const fn msg_id(&self) -> u32 {
        self.msg_id
    }

    /// Convert to bytes (big-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0] = self.version;
        bytes[1] = self.ttl;
        bytes[2] = self.msg_type;
        bytes[3] = 0;
        bytes[4..6].copy_from_slice(&self.org_port.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.length.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.org_ip.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.msg_id.to_be_bytes());

        bytes
    }

    /// Parse from bytes (big-endian)
    ///
    /// Only the first 16 bytes are read. The type byte is not validated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let Some(raw) = bytes.first_chunk::<HEADER_SIZE>() else {
            return Err(FormatError::Truncated {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        };

        Ok(Self {
            version: raw[0],
            ttl: raw[1],
            msg_type: raw[2],
            org_port: u16::from_be_bytes([raw[4], raw[5]]),
            length: u16::from_be_bytes([raw[6], raw[7]]),
            org_ip: u32::from_be_bytes([raw[8], raw[9], raw[10], raw[11]]),
            msg_id: u32::from_be_bytes([raw[12], raw[13], raw[14], raw[15]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = MessageHeader::new(MessageType::Query, 0x7F00_0001, 8601, 0xDEAD_BEEF)
            .with_length(12);
        let bytes = header.to_bytes();
        let decoded = MessageHeader::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, header);
        assert_eq!(decoded.version(), PROTOCOL_VERSION);
        assert_eq!(decoded.ttl(), DEFAULT_TTL);
        assert_eq!(decoded.message_type(), Some(MessageType::Query));
        assert_eq!(decoded.length(), 12);
    }

    #[test]
    fn test_network_byte_order() {
        let header = MessageHeader::new(MessageType::Join, 0xC0A8_0102, 0x2199, 0x0102_0304)
            .with_ttl(3)
            .with_length(0x0A0B);
        let bytes = header.to_bytes();

        assert_eq!(
            bytes,
            [
                0x01, 0x03, 0x03, 0x00, 0x21, 0x99, 0x0A, 0x0B, 0xC0, 0xA8, 0x01, 0x02, 0x01, 0x02,
                0x03, 0x04,
            ]
        );
    }

    #[test]
    fn test_truncated_header() {
        let result = MessageHeader::from_bytes(&[0u8; 15]);
        assert_eq!(
            result,
            Err(FormatError::Truncated {
                needed: HEADER_SIZE,
                got: 15
            })
        );
    }

    #[test]
    fn test_reserved_ignored_and_type_unvalidated() {
        let mut bytes = MessageHeader::new(MessageType::Ping, 1, 2, 3).to_bytes();
        bytes[2] = 0x42;
        bytes[3] = 0xFF;

        let decoded = MessageHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.msg_type_byte(), 0x42);
        assert_eq!(decoded.message_type(), None);
        assert_eq!(decoded.to_bytes()[3], 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: decode(encode(header)) == header for every field combination
            #[test]
            fn prop_header_roundtrip(
                version in any::<u8>(),
                ttl in any::<u8>(),
                type_byte in any::<u8>(),
                org_port in any::<u16>(),
                length in any::<u16>(),
                org_ip in any::<u32>(),
                msg_id in any::<u32>(),
            ) {
                let mut raw = MessageHeader::new(MessageType::Ping, org_ip, org_port, msg_id)
                    .with_version(version)
                    .with_ttl(ttl)
                    .with_length(length)
                    .to_bytes();
                raw[2] = type_byte;

                let decoded = MessageHeader::from_bytes(&raw).unwrap();
                prop_assert_eq!(decoded.version(), version);
                prop_assert_eq!(decoded.ttl(), ttl);
                prop_assert_eq!(decoded.msg_type_byte(), type_byte);
                prop_assert_eq!(decoded.org_port(), org_port);
                prop_assert_eq!(decoded.length(), length);
                prop_assert_eq!(decoded.org_ip(), org_ip);
                prop_assert_eq!(decoded.msg_id(), msg_id);
                prop_assert_eq!(decoded.to_bytes(), raw);
            }
        }
    }
}
