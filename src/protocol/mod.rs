//! Overlay protocol core
//!
//! This module provides the wire format, message types and body codecs.

mod codec;
mod cursor;
mod error;
mod header;
mod join;
mod message;
mod message_id;
pub mod metrics;
mod pong;
mod query;
mod types;

pub use codec::{decode, decode_header, encode, encode_header};
pub use cursor::FieldCursor;
pub use error::{DecodeError, FormatError};
pub use header::MessageHeader;
pub use join::{FixedKind, FixedMessage, JoinRequest, JoinResponse};
pub use message::Message;
pub use message_id::{generate_id, unix_timestamp};
pub use pong::{PONG_ENTRY_LEN, PONG_PREFIX_LEN, PeerAdvert, decode_pong, encode_pong_body};
pub use query::{
    QUERY_HIT_PREFIX_LEN, QueryHit, RESOURCE_ENTRY_LEN, ResourceEntry, decode_query_hit,
    query_message,
};
pub use types::MessageType;

/// Protocol version stamped on every locally built header
pub const PROTOCOL_VERSION: u8 = 1;

/// Time-to-live stamped on locally built headers
pub const DEFAULT_TTL: u8 = 5;

/// Time-to-live of a heartbeat PING (never relayed)
pub const HEARTBEAT_TTL: u8 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 16;

/// Largest body a header can declare
pub const MAX_BODY_SIZE: usize = u16::MAX as usize;

/// Join response status meaning "accepted"
pub const JOIN_ACCEPTED: u16 = 0x0200;

/// Maximum number of peer advertisements carried by one PONG
pub const MAX_PEER_AD: usize = 5;
