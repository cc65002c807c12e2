//! Message ID fingerprints.
//!
//! A message ID is an xxHash32 digest of the origin address and a timestamp.
//! It is a cheap, collision-tolerant fingerprint for recognising repeated
//! messages, not a security property.

use std::time::{SystemTime, UNIX_EPOCH};

use xxhash_rust::xxh32::xxh32;

const SEED_LEN: usize = 2 + 4 + 8;

/// Derive a message ID from the origin port, origin IPv4 and a timestamp.
///
/// Pure: the same three inputs always give the same ID. Messages sent by
/// one origin within the same timestamp tick therefore collide.
#[must_use]
pub fn generate_id(origin_port: u16, origin_ip: u32, timestamp: i64) -> u32 {
    let mut seed = [0u8; SEED_LEN];
    seed[0..2].copy_from_slice(&origin_port.to_be_bytes());
    seed[2..6].copy_from_slice(&origin_ip.to_be_bytes());
    seed[6..14].copy_from_slice(&timestamp.to_be_bytes());
    xxh32(&seed, 0)
}

/// Milliseconds since the Unix epoch, for stamping outgoing messages.
///
/// A clock set before the epoch reads as 0.
#[must_use]
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
