//! Listening side: bind, listen and accept raw sessions.

use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};

use tracing::{debug, instrument, warn};

use super::config::PeerConfig;
use super::error::{AcceptError, ListenError};
use super::session::Session;
use super::socket;

/// A bound, listening socket.
#[derive(Debug)]
pub struct ListenHandle {
    listener: TcpListener,
    local_addr: SocketAddrV4,
    config: PeerConfig,
}

/// Bind and listen on `bind_host:bind_port` with the default configuration.
///
/// See [`listen_with`].
pub fn listen(bind_host: &str, bind_port: u16) -> Result<ListenHandle, ListenError> {
    listen_with(bind_host, bind_port, &PeerConfig::default())
}

/// Bind and listen on `bind_host:bind_port`.
///
/// A host that is not a literal IPv4 address binds every interface. Port 0
/// lets the OS choose; the chosen port is available from
/// [`ListenHandle::local_addr`].
#[instrument(level = "info", skip(config))]
pub fn listen_with(
    bind_host: &str,
    bind_port: u16,
    config: &PeerConfig,
) -> Result<ListenHandle, ListenError> {
    let ip = socket::parse_ipv4(bind_host).unwrap_or_else(|| {
        warn!(host = bind_host, "not an IPv4 literal; listening on all interfaces");
        Ipv4Addr::UNSPECIFIED
    });

    let listener =
        socket::bind(SocketAddrV4::new(ip, bind_port)).map_err(ListenError::BindFailed)?;
    let local_addr = listener
        .local_addr()
        .and_then(socket::require_v4)
        .map_err(ListenError::ListenFailed)?;

    debug!(local = %local_addr, "listening");
    Ok(ListenHandle {
        listener,
        local_addr,
        config: config.clone(),
    })
}

impl ListenHandle {
    /// Bound address (with the OS-assigned port when 0 was requested).
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddrV4 {
        self.local_addr
    }

    /// Block until one peer connects and return it as a session.
    ///
    /// No join exchange happens here; see
    /// [`Session::expect_join_request`] and [`Session::send_join_response`].
    #[instrument(level = "info", skip(self), fields(local = %self.local_addr))]
    pub fn accept(&self) -> Result<Session, AcceptError> {
        let (stream, peer) = self.listener.accept().map_err(AcceptError::AcceptFailed)?;
        debug!(%peer, "accepted connection");
        socket::configure(&stream, &self.config).map_err(AcceptError::AcceptFailed)?;
        Session::from_stream(stream, self.config.clone()).map_err(AcceptError::AcceptFailed)
    }
}
