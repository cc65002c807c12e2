//! Blocking TCP transport: framing, join handshake, listen and accept.

mod config;
mod error;
mod framing;
mod handshake;
mod listener;
mod session;
mod socket;

pub use config::PeerConfig;
pub use error::{AcceptError, FrameError, JoinError, JoinFailure, ListenError, SessionError};
pub use framing::{read_message, write_message};
pub use handshake::{JoinState, join, join_with};
pub use listener::{ListenHandle, listen, listen_with};
pub use session::Session;
pub use socket::MAX_WAITING_CLIENTS;
