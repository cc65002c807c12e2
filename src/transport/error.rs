//! Transport-level error types covering framing, join, listen and accept failures.

use std::io;

use thiserror::Error;

use crate::protocol::{DecodeError, FormatError};

/// Failure while moving one framed message over a stream.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Peer closed the connection before the frame was complete.
    #[error("connection closed after {read} of {expected} bytes")]
    ConnectionClosed {
        /// Bytes of the current read that arrived.
        read: usize,
        /// Bytes the current read needed.
        expected: usize,
    },

    /// I/O failure while receiving.
    #[error("receive failed: {0}")]
    Recv(#[source] io::Error),

    /// I/O failure while sending.
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    /// Received bytes could not be parsed.
    #[error("malformed frame: {0}")]
    Format(#[from] FormatError),
}

/// Failure while joining a peer.
#[derive(Error, Debug)]
pub enum JoinError {
    /// Host is not a literal IPv4 address.
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    /// TCP connect (or reading the local address) failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] io::Error),

    /// Join request or response could not be transferred.
    #[error("join exchange failed: {0}")]
    Frame(#[from] FrameError),

    /// Reply body size is not that of a join response.
    #[error("unexpected reply to join: body of {length} bytes")]
    UnexpectedMessage {
        /// Body length declared by the reply.
        length: u16,
    },

    /// Join response could not be decoded.
    #[error("malformed join response: {0}")]
    Decode(#[from] DecodeError),

    /// Peer declined the join.
    #[error("join rejected with status {0:#06x}")]
    Rejected(u16),
}

impl JoinError {
    /// Which step of the handshake failed.
    #[must_use]
    pub fn kind(&self) -> JoinFailure {
        match self {
            Self::InvalidAddress(_) => JoinFailure::InvalidAddress,
            Self::ConnectFailed(_) => JoinFailure::ConnectFailed,
            Self::Frame(_) => JoinFailure::Transfer,
            Self::UnexpectedMessage { .. } | Self::Decode(_) => JoinFailure::UnexpectedMessage,
            Self::Rejected(status) => JoinFailure::Rejected(*status),
        }
    }
}

/// Copyable summary of a [`JoinError`], carried by a failed handshake state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFailure {
    /// Host was not a literal IPv4 address.
    InvalidAddress,
    /// Connect failed.
    ConnectFailed,
    /// Sending or receiving a join message failed.
    Transfer,
    /// Reply was not a join response.
    UnexpectedMessage,
    /// Peer declined with this status.
    Rejected(u16),
}

/// Failure while opening a listening socket.
#[derive(Error, Debug)]
pub enum ListenError {
    /// Binding the address failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] io::Error),

    /// Socket bound but is not usable for listening.
    #[error("listen failed: {0}")]
    ListenFailed(#[source] io::Error),
}

/// Failure while accepting an inbound connection.
#[derive(Error, Debug)]
pub enum AcceptError {
    /// The accept call (or preparing the accepted socket) failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] io::Error),
}

/// Failure of a message-level operation on an established session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Transfer failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Outgoing message could not be built.
    #[error("cannot build message: {0}")]
    Format(#[from] FormatError),

    /// Incoming message did not decode as expected.
    #[error("cannot decode message: {0}")]
    Decode(#[from] DecodeError),
}
