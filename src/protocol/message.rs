//! Overlay message implementation

use bytes::Bytes;

use super::{FormatError, MAX_BODY_SIZE, MessageHeader, MessageType};

/// Overlay message: a header plus exactly `header.length()` body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message header
    header: MessageHeader,
    /// Message body
    body: Bytes,
}

impl Message {
    /// Create a message, setting the header length from `body`
    pub fn new(header: MessageHeader, body: impl Into<Bytes>) -> Result<Self, FormatError> {
        let body = body.into();
        let length = u16::try_from(body.len()).map_err(|_| FormatError::BodyTooLarge {
            len: body.len(),
            max: MAX_BODY_SIZE,
        })?;

        Ok(Self {
            header: header.with_length(length),
            body,
        })
    }

    /// Create a header-only message
    #[must_use]
    pub fn empty(header: MessageHeader) -> Self {
        Self {
            header: header.with_length(0),
            body: Bytes::new(),
        }
    }

    /// Assemble a message whose body length already matches the header
    pub(crate) fn from_parts(header: MessageHeader, body: Bytes) -> Self {
        debug_assert_eq!(usize::from(header.length()), body.len());
        Self { header, body }
    }

    /// Get message type
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        self.header.message_type()
    }

    /// Get message ID
    #[must_use]
    pub fn msg_id(&self) -> u32 {
        self.header.msg_id()
    }

    /// Get body
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Encode message to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        super::encode(self)
    }

    /// Decode message from bytes
    pub fn decode(bytes: impl Into<Bytes>) -> Result<Self, FormatError> {
        super::decode(bytes.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(msg_type: MessageType) -> MessageHeader {
        MessageHeader::new(msg_type, 0x7F00_0001, 4000, 99)
    }

    #[test]
    fn test_message_creation() {
        let msg = Message::new(header(MessageType::Query), &b"ubuntu iso"[..]).unwrap();

        assert_eq!(msg.message_type(), Some(MessageType::Query));
        assert_eq!(msg.body().as_ref(), b"ubuntu iso");
        assert_eq!(msg.header().length(), 10);
        assert_eq!(msg.msg_id(), 99);
    }

    #[test]
    fn test_length_follows_body() {
        let stale = header(MessageType::Query).with_length(500);
        let msg = Message::new(stale, vec![1u8, 2, 3]).unwrap();
        assert_eq!(msg.header().length(), 3);

        let empty = Message::empty(stale);
        assert_eq!(empty.header().length(), 0);
        assert!(empty.body().is_empty());
    }

    #[test]
    fn test_body_too_large() {
        let result = Message::new(header(MessageType::Query), vec![0u8; MAX_BODY_SIZE + 1]);
        assert_eq!(
            result,
            Err(FormatError::BodyTooLarge {
                len: MAX_BODY_SIZE + 1,
                max: MAX_BODY_SIZE
            })
        );
        assert!(Message::new(header(MessageType::Query), vec![0u8; MAX_BODY_SIZE]).is_ok());
    }

    #[test]
    fn test_message_roundtrip() {
        let original = Message::new(header(MessageType::Query), &b"hello world"[..]).unwrap();
        let encoded = original.encode();
        let decoded = Message::decode(encoded).unwrap();

        assert_eq!(decoded, original);
    }
}
