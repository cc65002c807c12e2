//! Minimal TCP socket helpers for overlay sessions.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::config::PeerConfig;

/// Parse a literal dotted-quad IPv4 address. No name resolution.
pub(crate) fn parse_ipv4(host: &str) -> Option<Ipv4Addr> {
    host.trim().parse().ok()
}

/// Connect a blocking TCP stream to `addr`.
pub(crate) fn connect(addr: SocketAddrV4, config: &PeerConfig) -> io::Result<TcpStream> {
    let stream = TcpStream::connect(addr)?;
    configure(&stream, config)?;
    Ok(stream)
}

/// Pending connections the kernel queues before `accept` picks them up.
pub const MAX_WAITING_CLIENTS: i32 = 2;

/// Bind a listening socket on `addr` with a backlog of [`MAX_WAITING_CLIENTS`].
pub(crate) fn bind(addr: SocketAddrV4) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    #[cfg(unix)]
    socket.set_reuse_address(true)?;
    socket.bind(&SockAddr::from(addr))?;
    socket.listen(MAX_WAITING_CLIENTS)?;
    Ok(socket.into())
}

/// Apply the configured timeouts and blocking mode to a stream.
pub(crate) fn configure(stream: &TcpStream, config: &PeerConfig) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(config.read_timeout)?;
    stream.set_write_timeout(config.write_timeout)?;
    Ok(())
}

/// Narrow a socket address to IPv4; overlay headers only carry IPv4 origins.
pub(crate) fn require_v4(addr: SocketAddr) -> io::Result<SocketAddrV4> {
    match addr {
        SocketAddr::V4(v4) => Ok(v4),
        SocketAddr::V6(v6) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("IPv6 address {v6} cannot be carried in an overlay header"),
        )),
    }
}
