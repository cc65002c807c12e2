//! Per-peer configuration.

use std::time::Duration;

use crate::protocol::{DEFAULT_TTL, PROTOCOL_VERSION};

/// Settings applied to sessions and the headers they build.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PeerConfig {
    /// Protocol version stamped on outgoing headers.
    pub version: u8,
    /// Time-to-live stamped on outgoing headers.
    pub ttl: u8,
    /// Optional read timeout for session sockets.
    pub read_timeout: Option<Duration>,
    /// Optional write timeout for session sockets.
    pub write_timeout: Option<Duration>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            ttl: DEFAULT_TTL,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
