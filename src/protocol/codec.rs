//! Overlay message codec (encode/decode)
//!
//! Whole-buffer encoding and decoding. Stream framing lives in
//! `transport::framing`.

use bytes::Bytes;

use super::{FormatError, HEADER_SIZE, Message, MessageHeader};

/// Encode a header to its 16-byte wire form
#[must_use]
pub fn encode_header(header: &MessageHeader) -> [u8; HEADER_SIZE] {
    header.to_bytes()
}

/// Decode a header from the front of `bytes`
pub fn decode_header(bytes: &[u8]) -> Result<MessageHeader, FormatError> {
    MessageHeader::from_bytes(bytes)
}

/// Encode a message to bytes
///
/// # Format
///
/// ```text
/// [HEADER (16 bytes)] [BODY (header.length bytes)]
/// ```
#[must_use]
pub fn encode(message: &Message) -> Vec<u8> {
    let body = message.body();

    let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
    bytes.extend_from_slice(&message.header().to_bytes());
    bytes.extend_from_slice(body);

    bytes
}

/// Decode a message from bytes
///
/// Reads the header and then exactly `length` body bytes; anything after
/// the declared body is left untouched.
///
/// # Errors
///
/// Returns [`FormatError::Truncated`] if the buffer is shorter than the
/// header or than the body the header declares.
pub fn decode(bytes: Bytes) -> Result<Message, FormatError> {
    let header = MessageHeader::from_bytes(&bytes)?;

    let total_size = HEADER_SIZE + usize::from(header.length());
    if bytes.len() < total_size {
        return Err(FormatError::Truncated {
            needed: total_size,
            got: bytes.len(),
        });
    }

    let body = bytes.slice(HEADER_SIZE..total_size);
    Ok(Message::from_parts(header, body))
}
