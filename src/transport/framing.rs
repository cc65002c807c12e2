//! Length-prefixed framing over a byte stream.
//!
//! A frame is a 16-byte header followed by exactly `header.length` body
//! bytes. Streams may deliver a frame in arbitrary pieces, so both
//! directions loop until the exact byte count has moved.

use std::io::{self, ErrorKind, Read, Write};
use std::time::Instant;

use bytes::BytesMut;
use tracing::trace;

use super::error::FrameError;
use crate::protocol::metrics::{MessageDirection, Metrics};
use crate::protocol::{HEADER_SIZE, Message, MessageHeader};

/// Read one message: a header, then exactly the body it declares.
///
/// # Errors
///
/// - [`FrameError::ConnectionClosed`] if the peer closes mid-frame
/// - [`FrameError::Recv`] on any other read failure
pub fn read_message<R: Read + ?Sized>(reader: &mut R) -> Result<Message, FrameError> {
    let started = Instant::now();
    let result = read_frame(reader);
    match &result {
        Ok(message) => {
            trace!(
                msg_type = message.header().msg_type_byte(),
                length = message.header().length(),
                msg_id = message.msg_id(),
                "received frame"
            );
            Metrics::record_message(
                MessageDirection::Received,
                message.message_type(),
                started.elapsed(),
            );
        }
        Err(err) => {
            trace!(error = %err, "frame read failed");
            Metrics::record_error();
        }
    }
    result
}

/// Write one message as a single contiguous buffer.
///
/// # Errors
///
/// Returns [`FrameError::Send`] if the stream fails or stops accepting bytes.
pub fn write_message<W: Write + ?Sized>(
    writer: &mut W,
    message: &Message,
) -> Result<(), FrameError> {
    let started = Instant::now();
    let frame = message.encode();
    let result =
        write_full(writer, &frame).and_then(|()| writer.flush().map_err(FrameError::Send));
    match &result {
        Ok(()) => {
            trace!(
                msg_type = message.header().msg_type_byte(),
                length = message.header().length(),
                msg_id = message.msg_id(),
                "sent frame"
            );
            Metrics::record_message(
                MessageDirection::Sent,
                message.message_type(),
                started.elapsed(),
            );
        }
        Err(err) => {
            trace!(error = %err, "frame write failed");
            Metrics::record_error();
        }
    }
    result
}

fn read_frame<R: Read + ?Sized>(reader: &mut R) -> Result<Message, FrameError> {
    let mut raw = [0u8; HEADER_SIZE];
    read_full(reader, &mut raw)?;
    let header = MessageHeader::from_bytes(&raw)?;

    let mut body = BytesMut::zeroed(usize::from(header.length()));
    read_full(reader, &mut body)?;

    Ok(Message::from_parts(header, body.freeze()))
}

fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FrameError::ConnectionClosed {
                    read: filled,
                    expected: buf.len(),
                });
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(FrameError::Recv(err)),
        }
    }
    Ok(())
}

fn write_full<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<(), FrameError> {
    let mut sent = 0;
    while sent < buf.len() {
        match writer.write(&buf[sent..]) {
            Ok(0) => {
                return Err(FrameError::Send(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("stream accepted {sent} of {} bytes", buf.len()),
                )));
            }
            Ok(n) => sent += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(FrameError::Send(err)),
        }
    }
    Ok(())
}
