//! Established peer sessions.

use std::any::Any;
use std::fmt;
use std::io;
use std::net::{Shutdown, SocketAddr, SocketAddrV4, TcpStream};

use bytes::Bytes;
use tracing::debug;

use super::config::PeerConfig;
use super::error::{FrameError, SessionError};
use super::framing::{read_message, write_message};
use super::listener::ListenHandle;
use super::socket;
use crate::protocol::metrics::Metrics;
use crate::protocol::{
    DecodeError, FixedKind, FixedMessage, HEARTBEAT_TTL, JoinRequest, JoinResponse, Message,
    MessageHeader, MessageType, PeerAdvert, QueryHit, decode_query_hit, encode_pong_body,
    generate_id, query_message, unix_timestamp,
};

/// One connected peer.
///
/// The session owns its stream (and optionally a listening socket) until it
/// is closed or dropped. Headers it builds carry its local address as the
/// origin.
pub struct Session {
    stream: TcpStream,
    local_addr: SocketAddrV4,
    peer_addr: SocketAddr,
    listener: Option<ListenHandle>,
    config: PeerConfig,
    user_data: Option<Box<dyn Any + Send>>,
}

impl Session {
    /// Wrap a connected stream; reads back the local address.
    pub(crate) fn from_stream(stream: TcpStream, config: PeerConfig) -> io::Result<Self> {
        let local_addr = socket::require_v4(stream.local_addr()?)?;
        let peer_addr = stream.peer_addr()?;
        Metrics::record_session_open();
        debug!(local = %local_addr, peer = %peer_addr, "session opened");
        Ok(Self {
            stream,
            local_addr,
            peer_addr,
            listener: None,
            config,
            user_data: None,
        })
    }

    /// Locally bound address; the origin of every header this session builds.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddrV4 {
        self.local_addr
    }

    /// Address of the remote peer.
    #[must_use]
    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &PeerConfig {
        &self.config
    }

    /// Borrow the underlying stream, e.g. to adjust socket options.
    #[must_use]
    pub const fn stream(&self) -> &TcpStream {
        &self.stream
    }

    /// Keep a listening socket alongside this session.
    pub fn attach_listener(&mut self, listener: ListenHandle) {
        self.listener = Some(listener);
    }

    /// Attached listening socket, if any.
    #[must_use]
    pub const fn listener(&self) -> Option<&ListenHandle> {
        self.listener.as_ref()
    }

    /// Bound address of the attached listening socket, if any.
    #[must_use]
    pub fn listen_addr(&self) -> Option<SocketAddrV4> {
        self.listener.as_ref().map(ListenHandle::local_addr)
    }

    /// Detach the listening socket.
    pub fn take_listener(&mut self) -> Option<ListenHandle> {
        self.listener.take()
    }

    /// Store caller-defined data on the session, replacing any previous value.
    pub fn set_user_data<T: Any + Send>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    /// Borrow caller-defined data if it has type `T`.
    #[must_use]
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref()
    }

    /// Mutably borrow caller-defined data if it has type `T`.
    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_deref_mut()?.downcast_mut()
    }

    /// Remove and return caller-defined data.
    pub fn take_user_data(&mut self) -> Option<Box<dyn Any + Send>> {
        self.user_data.take()
    }

    /// Build a header stamped with this session's origin and a fresh ID.
    ///
    /// The ID depends only on the origin and the current millisecond, so two
    /// headers built within the same millisecond share an ID.
    #[must_use]
    pub fn header(&self, msg_type: MessageType) -> MessageHeader {
        let ip = self.local_addr.ip().to_bits();
        let port = self.local_addr.port();
        let msg_id = generate_id(port, ip, unix_timestamp());
        MessageHeader::new(msg_type, ip, port, msg_id)
            .with_version(self.config.version)
            .with_ttl(self.config.ttl)
    }

    /// Send one message.
    pub fn send(&mut self, message: &Message) -> Result<(), FrameError> {
        write_message(&mut self.stream, message)
    }

    /// Block until one message arrives.
    pub fn read_message(&mut self) -> Result<Message, FrameError> {
        read_message(&mut self.stream)
    }

    /// Read one message and decode it as the fixed-size kind expected.
    pub fn read_fixed(&mut self, expected: FixedKind) -> Result<FixedMessage, SessionError> {
        let message = self.read_message()?;
        Ok(FixedMessage::decode(expected, &message)?)
    }

    /// Send a QUERY carrying `key`; does not wait for a reply.
    ///
    /// Returns the message as sent so the caller can match replies by ID.
    pub fn send_query(&mut self, key: impl Into<Bytes>) -> Result<Message, SessionError> {
        let message = query_message(self.header(MessageType::Query), key)?;
        self.send(&message)?;
        Ok(message)
    }

    /// Block until one message arrives and decode it as a QHIT.
    pub fn read_query_hit(&mut self) -> Result<QueryHit, SessionError> {
        let message = self.read_message()?;
        Ok(decode_query_hit(&message)?)
    }

    /// Answer a query with the given results.
    pub fn send_query_hit(&mut self, hit: &QueryHit) -> Result<Message, SessionError> {
        let message = hit.to_message(self.header(MessageType::QueryHit))?;
        self.send(&message)?;
        Ok(message)
    }

    /// Send a heartbeat PING (TTL 1, empty body).
    pub fn send_ping(&mut self) -> Result<Message, SessionError> {
        let header = self.header(MessageType::Ping).with_ttl(HEARTBEAT_TTL);
        let message = Message::empty(header);
        self.send(&message)?;
        Ok(message)
    }

    /// Send a PONG advertising up to five peers.
    pub fn send_pong(&mut self, peers: &[PeerAdvert]) -> Result<Message, SessionError> {
        let message = Message::new(self.header(MessageType::Pong), encode_pong_body(peers))?;
        self.send(&message)?;
        Ok(message)
    }

    /// Announce an orderly disconnect.
    pub fn send_bye(&mut self) -> Result<Message, SessionError> {
        let message = Message::empty(self.header(MessageType::Bye));
        self.send(&message)?;
        Ok(message)
    }

    /// Read the peer's join request on an accepted session.
    ///
    /// Nothing is sent back; call [`Session::send_join_response`] to answer.
    pub fn expect_join_request(&mut self) -> Result<JoinRequest, SessionError> {
        match self.read_fixed(FixedKind::JoinRequest)? {
            FixedMessage::JoinRequest(request) => Ok(request),
            FixedMessage::JoinResponse(response) => {
                Err(SessionError::Decode(DecodeError::LengthMismatch {
                    expected: FixedKind::JoinRequest.body_len(),
                    found: usize::from(response.header().length()),
                }))
            }
        }
    }

    /// Answer a join request with `status` (`JOIN_ACCEPTED` to accept).
    pub fn send_join_response(&mut self, status: u16) -> Result<Message, SessionError> {
        let message = JoinResponse::new(self.header(MessageType::Join), status).to_message();
        self.send(&message)?;
        Ok(message)
    }

    /// Release every handle the session owns.
    pub fn close(self) -> io::Result<()> {
        debug!(local = %self.local_addr, peer = %self.peer_addr, "closing session");
        match self.stream.shutdown(Shutdown::Both) {
            Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("local_addr", &self.local_addr)
            .field("peer_addr", &self.peer_addr)
            .field("listen_addr", &self.listen_addr())
            .field("has_user_data", &self.user_data.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(local = %self.local_addr, "session dropped");
        Metrics::record_session_close();
    }
}
