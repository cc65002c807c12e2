//! Overlay message types

use std::fmt;

/// Overlay message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Network probe / heartbeat
    Ping = 0x00,
    /// Reply to a PING, may advertise peers
    Pong = 0x01,
    /// Orderly disconnect
    Bye = 0x02,
    /// Join request or join response
    Join = 0x03,

    /// Search request carrying an opaque key
    Query = 0x80,
    /// Search response carrying resource entries
    QueryHit = 0x81,
}

impl MessageType {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Ping),
            0x01 => Some(Self::Pong),
            0x02 => Some(Self::Bye),
            0x03 => Some(Self::Join),
            0x80 => Some(Self::Query),
            0x81 => Some(Self::QueryHit),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this message type carries a variable-length body
    #[must_use]
    pub const fn has_variable_body(self) -> bool {
        self.as_u8() >= 0x80
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ping => "PING",
            Self::Pong => "PONG",
            Self::Bye => "BYE",
            Self::Join => "JOIN",
            Self::Query => "QUERY",
            Self::QueryHit => "QHIT",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_roundtrip() {
        let types = [
            MessageType::Ping,
            MessageType::Pong,
            MessageType::Bye,
            MessageType::Join,
            MessageType::Query,
            MessageType::QueryHit,
        ];

        for msg_type in types {
            let byte = msg_type.as_u8();
            let decoded = MessageType::from_u8(byte).unwrap();
            assert_eq!(msg_type, decoded);
        }
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(MessageType::Join.as_u8(), 0x03);
        assert_eq!(MessageType::QueryHit.as_u8(), 0x81);
        assert_eq!(MessageType::from_u8(0x04), None);
        assert_eq!(MessageType::from_u8(0x82), None);
    }

    #[test]
    fn test_variable_body() {
        assert!(MessageType::Query.has_variable_body());
        assert!(MessageType::QueryHit.has_variable_body());
        assert!(!MessageType::Join.has_variable_body());
        assert!(!MessageType::Ping.has_variable_body());
    }
}
