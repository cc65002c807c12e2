//! Peerwire - wire protocol core for a small peer-to-peer overlay
//!
//! Peers exchange length-prefixed messages over TCP. Every message starts
//! with a 16-byte big-endian header naming its type, TTL, origin address and
//! a hashed message ID; the body that follows is exactly `length` bytes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use peerwire::{JOIN_ACCEPTED, join, listen};
//!
//! // Listening peer
//! let handle = listen("0.0.0.0", peerwire::DEFAULT_PORT)?;
//! # std::thread::spawn(move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let mut inbound = handle.accept()?;
//! inbound.expect_join_request()?;
//! inbound.send_join_response(JOIN_ACCEPTED)?;
//! # Ok(())
//! # });
//!
//! // Joining peer
//! let mut session = join("127.0.0.1", peerwire::DEFAULT_PORT)?;
//! session.send_query("movies/*")?;
//! let hit = session.read_query_hit()?;
//! for entry in hit.entries() {
//!     println!("{} -> {}", entry.id, entry.value);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - **Header codec** - fixed 16-byte big-endian layout
//! - **Message IDs** - `xxHash32` over origin port, address and timestamp
//! - **Framing** - exact-length reads and writes over any `Read`/`Write`
//! - **Join handshake** - connect, request, accept or reject
//! - **Query codecs** - QUERY keys and QHIT result lists

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    DEFAULT_TTL, HEADER_SIZE, JOIN_ACCEPTED, MAX_BODY_SIZE, Message, MessageHeader, MessageType,
    PROTOCOL_VERSION, QueryHit, ResourceEntry,
};
pub use transport::{ListenHandle, PeerConfig, Session, join, listen};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default overlay port
pub const DEFAULT_PORT: u16 = 8601;
