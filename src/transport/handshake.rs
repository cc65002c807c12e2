//! Connect-and-join handshake.
//!
//! ```text
//! Connecting --(join accepted)--> Joined
//!      \
//!       +--(any failure)--------> Failed(reason)
//! ```

use std::net::SocketAddrV4;

use tracing::{debug, instrument, warn};

use super::config::PeerConfig;
use super::error::{FrameError, JoinError, JoinFailure, SessionError};
use super::session::Session;
use super::socket;
use crate::protocol::{DecodeError, FixedKind, FixedMessage, JoinRequest, MessageType};

/// Progress of a join handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    /// Opening the connection and exchanging join messages.
    Connecting,
    /// Peer accepted the join.
    Joined,
    /// Handshake ended in failure.
    Failed(JoinFailure),
}

impl JoinState {
    /// Whether the handshake has finished (either way).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Connecting)
    }
}

/// Join the peer at `remote_host:remote_port` with the default configuration.
///
/// See [`join_with`].
pub fn join(remote_host: &str, remote_port: u16) -> Result<Session, JoinError> {
    join_with(remote_host, remote_port, &PeerConfig::default())
}

/// Join the peer at `remote_host:remote_port`.
///
/// `remote_host` must be a literal IPv4 address; names are not resolved.
/// On any failure the socket opened here is closed before returning.
#[instrument(level = "info", skip(config))]
pub fn join_with(
    remote_host: &str,
    remote_port: u16,
    config: &PeerConfig,
) -> Result<Session, JoinError> {
    let mut handshake = Handshake::new();
    let result = handshake.run(remote_host, remote_port, config);
    debug_assert!(handshake.state.is_terminal());
    result
}

#[derive(Debug)]
struct Handshake {
    state: JoinState,
}

impl Handshake {
    const fn new() -> Self {
        Self {
            state: JoinState::Connecting,
        }
    }

    fn run(
        &mut self,
        remote_host: &str,
        remote_port: u16,
        config: &PeerConfig,
    ) -> Result<Session, JoinError> {
        let ip = socket::parse_ipv4(remote_host)
            .ok_or_else(|| self.fail(JoinError::InvalidAddress(remote_host.to_owned())))?;
        let remote = SocketAddrV4::new(ip, remote_port);
        debug!(%remote, state = ?self.state, "connecting to peer");

        let stream = socket::connect(remote, config)
            .map_err(|err| self.fail(JoinError::ConnectFailed(err)))?;
        // Dropping the stream or session on the error paths below closes the socket.
        let mut session = Session::from_stream(stream, config.clone())
            .map_err(|err| self.fail(JoinError::ConnectFailed(err)))?;

        match exchange(&mut session) {
            Ok(()) => {
                self.state = JoinState::Joined;
                debug!(local = %session.local_addr(), state = ?self.state, "joined peer");
                Ok(session)
            }
            Err(err) => {
                if let Err(close_err) = session.close() {
                    debug!(error = %close_err, "closing failed join socket");
                }
                Err(self.fail(err))
            }
        }
    }

    fn fail(&mut self, err: JoinError) -> JoinError {
        self.state = JoinState::Failed(err.kind());
        match &err {
            JoinError::Rejected(status) => {
                warn!(status = format_args!("{status:#06x}"), "join rejected");
            }
            other => debug!(error = %other, state = ?self.state, "join failed"),
        }
        err
    }
}

fn exchange(session: &mut Session) -> Result<(), JoinError> {
    let request = JoinRequest::new(session.header(MessageType::Join)).to_message();
    session.send(&request)?;

    let response = match session.read_fixed(FixedKind::JoinResponse) {
        Ok(FixedMessage::JoinResponse(response)) => response,
        Ok(other @ FixedMessage::JoinRequest(_)) => {
            return Err(JoinError::UnexpectedMessage {
                length: other.header().length(),
            });
        }
        Err(err) => return Err(reply_error(err)),
    };
    debug!(status = response.status(), "join response");
    if !response.is_accepted() {
        return Err(JoinError::Rejected(response.status()));
    }
    Ok(())
}

fn reply_error(err: SessionError) -> JoinError {
    match err {
        SessionError::Frame(err) => JoinError::Frame(err),
        SessionError::Format(err) => JoinError::Frame(FrameError::Format(err)),
        SessionError::Decode(DecodeError::LengthMismatch { found, .. }) => {
            JoinError::UnexpectedMessage {
                length: u16::try_from(found).unwrap_or(u16::MAX),
            }
        }
        SessionError::Decode(err) => JoinError::Decode(err),
    }
}
