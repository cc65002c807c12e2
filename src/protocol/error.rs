//! Protocol error types

use thiserror::Error;

use super::MessageType;

/// Errors raised while turning bytes into headers or messages (and back)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than the fixed layout requires
    #[error("truncated input: need {needed} bytes, got {got}")]
    Truncated {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Body does not fit the 16-bit length field
    #[error("body too large: {len} bytes (max {max})")]
    BodyTooLarge {
        /// Body size
        len: usize,
        /// Maximum allowed
        max: usize,
    },
}

/// Errors raised while interpreting a message body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Message type does not match what the caller expected
    #[error("wrong message type: expected {expected}, got {found:#04x}")]
    WrongType {
        /// Expected message type
        expected: MessageType,
        /// Type byte found in the header
        found: u8,
    },

    /// Body is shorter than its declared contents demand
    #[error("truncated body: need {needed} bytes, got {got}")]
    Truncated {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Body length disagrees with the fixed size or the declared entry count
    #[error("unexpected body length: expected {expected} bytes, got {found}")]
    LengthMismatch {
        /// Body size implied by the message kind or its count field
        expected: usize,
        /// Body size declared by the header
        found: usize,
    },
}
