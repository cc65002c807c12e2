//! Fixed-size join messages.
//!
//! Both halves of the join exchange use the `JOIN` type byte. The decoder is
//! told which half it expects instead of guessing from the bytes.

use bytes::{BufMut, BytesMut};

use super::{DecodeError, FieldCursor, JOIN_ACCEPTED, Message, MessageHeader, MessageType};

/// Which fixed-size message the caller expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedKind {
    /// Header-only join request.
    JoinRequest,
    /// Join response carrying a 16-bit status.
    JoinResponse,
}

impl FixedKind {
    /// Exact body size of this message kind.
    #[must_use]
    pub const fn body_len(self) -> usize {
        match self {
            Self::JoinRequest => 0,
            Self::JoinResponse => 2,
        }
    }
}

/// A decoded fixed-size message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedMessage {
    /// Join request.
    JoinRequest(JoinRequest),
    /// Join response.
    JoinResponse(JoinResponse),
}

impl FixedMessage {
    /// Decode `message` as the fixed-size kind the caller expects.
    pub fn decode(expected: FixedKind, message: &Message) -> Result<Self, DecodeError> {
        match expected {
            FixedKind::JoinRequest => JoinRequest::decode(message).map(Self::JoinRequest),
            FixedKind::JoinResponse => JoinResponse::decode(message).map(Self::JoinResponse),
        }
    }

    /// Header of the decoded message.
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        match self {
            Self::JoinRequest(request) => &request.header,
            Self::JoinResponse(response) => &response.header,
        }
    }
}

/// Header-only request to join a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRequest {
    header: MessageHeader,
}

impl JoinRequest {
    /// Wrap a header as a join request.
    #[must_use]
    pub const fn new(header: MessageHeader) -> Self {
        Self { header }
    }

    /// Access the header.
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Build the wire message (type forced to `JOIN`, empty body).
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::empty(self.header.with_message_type(MessageType::Join))
    }

    /// Decode a join request; the type must be `JOIN` and the body empty.
    pub fn decode(message: &Message) -> Result<Self, DecodeError> {
        expect_type(message, MessageType::Join)?;
        expect_len(message, FixedKind::JoinRequest)?;
        Ok(Self {
            header: *message.header(),
        })
    }
}

/// Reply to a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinResponse {
    header: MessageHeader,
    status: u16,
}

impl JoinResponse {
    /// Create a response with the given status.
    #[must_use]
    pub const fn new(header: MessageHeader, status: u16) -> Self {
        Self { header, status }
    }

    /// Access the header.
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Status code carried by the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the peer accepted the join.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.status == JOIN_ACCEPTED
    }

    /// Build the wire message (type forced to `JOIN`, 2-byte status body).
    #[must_use]
    pub fn to_message(&self) -> Message {
        let mut body = BytesMut::with_capacity(FixedKind::JoinResponse.body_len());
        body.put_u16(self.status);
        let header = self.header.with_message_type(MessageType::Join).with_length(2);
        Message::from_parts(header, body.freeze())
    }

    /// Decode a join response.
    ///
    /// Only the body size is checked; peers are not required to echo the
    /// `JOIN` type byte on the response.
    pub fn decode(message: &Message) -> Result<Self, DecodeError> {
        expect_len(message, FixedKind::JoinResponse)?;
        let mut cursor = FieldCursor::new(message.body());
        let status = cursor.read_u16()?;
        Ok(Self {
            header: *message.header(),
            status,
        })
    }
}

fn expect_type(message: &Message, expected: MessageType) -> Result<(), DecodeError> {
    let found = message.header().msg_type_byte();
    if found != expected.as_u8() {
        return Err(DecodeError::WrongType { expected, found });
    }
    Ok(())
}

fn expect_len(message: &Message, kind: FixedKind) -> Result<(), DecodeError> {
    let found = usize::from(message.header().length());
    if found != kind.body_len() {
        return Err(DecodeError::LengthMismatch {
            expected: kind.body_len(),
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> MessageHeader {
        MessageHeader::new(MessageType::Join, 0x0A00_0002, 5000, 0x1234)
    }

    #[test]
    fn test_join_request_wire_form() {
        let message = JoinRequest::new(header()).to_message();
        let bytes = message.encode();

        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[2], 0x03);
        assert_eq!(&bytes[6..8], &[0, 0]);
    }

    #[test]
    fn test_join_response_wire_form() {
        let message = JoinResponse::new(header(), JOIN_ACCEPTED).to_message();
        let bytes = message.encode();

        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[6..8], &[0x00, 0x02]);
        assert_eq!(&bytes[16..18], &[0x02, 0x00]);
    }

    #[test]
    fn test_decode_by_expected_kind() {
        let response = JoinResponse::new(header(), 0x0100).to_message();
        let decoded = FixedMessage::decode(FixedKind::JoinResponse, &response).unwrap();

        match decoded {
            FixedMessage::JoinResponse(resp) => {
                assert_eq!(resp.status(), 0x0100);
                assert!(!resp.is_accepted());
            }
            FixedMessage::JoinRequest(_) => panic!("decoded the wrong variant"),
        }
        assert_eq!(decoded.header().msg_id(), 0x1234);

        // The same bytes are not a join request.
        assert_eq!(
            FixedMessage::decode(FixedKind::JoinRequest, &response),
            Err(DecodeError::LengthMismatch {
                expected: 0,
                found: 2
            })
        );
    }

    #[test]
    fn test_request_requires_join_type() {
        let ping = Message::empty(MessageHeader::new(MessageType::Ping, 1, 2, 3));
        assert_eq!(
            JoinRequest::decode(&ping),
            Err(DecodeError::WrongType {
                expected: MessageType::Join,
                found: 0x00
            })
        );
    }

    #[test]
    fn test_accepted_status() {
        let response = JoinResponse::new(header(), JOIN_ACCEPTED).to_message();
        assert!(JoinResponse::decode(&response).unwrap().is_accepted());
    }
}
