//! Query and query-hit bodies.
//!
//! A QUERY body is the opaque search key. A QHIT body is:
//!
//! ```text
//! [COUNT (2)] [PAD (2)] COUNT x { [ID (2)] [VALUE (4)] }
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    DecodeError, FieldCursor, FormatError, MAX_BODY_SIZE, Message, MessageHeader, MessageType,
};

/// Width of the count field plus its alignment padding.
pub const QUERY_HIT_PREFIX_LEN: usize = 4;

/// Width of one resource entry on the wire.
pub const RESOURCE_ENTRY_LEN: usize = 6;

/// One result carried by a query-hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceEntry {
    /// Resource identifier.
    pub id: u16,
    /// Resource value.
    pub value: u32,
}

impl ResourceEntry {
    /// Create a new entry.
    #[must_use]
    pub const fn new(id: u16, value: u32) -> Self {
        Self { id, value }
    }
}

/// Decoded query-hit: an ordered list of resource entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryHit {
    entries: Vec<ResourceEntry>,
}

impl QueryHit {
    /// Create a query-hit from entries.
    #[must_use]
    pub fn new(entries: Vec<ResourceEntry>) -> Self {
        Self { entries }
    }

    /// Borrow the entries in wire order.
    #[must_use]
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the query-hit carries no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take ownership of the entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<ResourceEntry> {
        self.entries
    }

    /// Encode the QHIT body.
    pub fn encode_body(&self) -> Result<Bytes, FormatError> {
        let len = QUERY_HIT_PREFIX_LEN + self.entries.len() * RESOURCE_ENTRY_LEN;
        let count = u16::try_from(self.entries.len())
            .ok()
            .filter(|_| len <= MAX_BODY_SIZE)
            .ok_or(FormatError::BodyTooLarge {
                len,
                max: MAX_BODY_SIZE,
            })?;

        let mut body = BytesMut::with_capacity(len);
        body.put_u16(count);
        body.put_u16(0);
        for entry in &self.entries {
            body.put_u16(entry.id);
            body.put_u32(entry.value);
        }
        Ok(body.freeze())
    }

    /// Build a full QHIT message under `header`.
    pub fn to_message(&self, header: MessageHeader) -> Result<Message, FormatError> {
        Message::new(header.with_message_type(MessageType::QueryHit), self.encode_body()?)
    }

    /// Decode a QHIT body.
    pub fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = FieldCursor::new(body);
        let count = usize::from(cursor.read_u16()?);
        cursor.skip(2)?;
        cursor.require(count * RESOURCE_ENTRY_LEN)?;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = cursor.read_u16()?;
            let value = cursor.read_u32()?;
            entries.push(ResourceEntry { id, value });
        }
        if cursor.remaining() != 0 {
            return Err(DecodeError::LengthMismatch {
                expected: cursor.position(),
                found: body.len(),
            });
        }
        Ok(Self { entries })
    }
}

/// Build a QUERY message carrying `key` under `header`.
pub fn query_message(header: MessageHeader, key: impl Into<Bytes>) -> Result<Message, FormatError> {
    Message::new(header.with_message_type(MessageType::Query), key)
}

/// Decode a QHIT message into its entries.
///
/// # Errors
///
/// - [`DecodeError::WrongType`] if the message is not a QHIT
/// - [`DecodeError::Truncated`] if the body is shorter than
///   `4 + count * 6` bytes
/// - [`DecodeError::LengthMismatch`] if bytes follow the last entry
pub fn decode_query_hit(message: &Message) -> Result<QueryHit, DecodeError> {
    let found = message.header().msg_type_byte();
    if found != MessageType::QueryHit.as_u8() {
        return Err(DecodeError::WrongType {
            expected: MessageType::QueryHit,
            found,
        });
    }
    QueryHit::decode_body(message.body())
}
