//! PONG bodies advertising known peers.
//!
//! ```text
//! [COUNT (2)] [PAD (2)] COUNT x { [IPV4 (4)] [PORT (2)] [PAD (2)] }
//! ```

use std::net::{Ipv4Addr, SocketAddrV4};

use bytes::{BufMut, Bytes, BytesMut};

use super::{DecodeError, FieldCursor, MAX_PEER_AD, Message, MessageType};

/// Width of the count field plus its padding.
pub const PONG_PREFIX_LEN: usize = 4;

/// Width of one peer advertisement on the wire.
pub const PONG_ENTRY_LEN: usize = 8;

/// A peer address advertised in a PONG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAdvert {
    /// Advertised IPv4 address.
    pub ip: Ipv4Addr,
    /// Advertised listening port.
    pub port: u16,
}

impl PeerAdvert {
    /// Create a new advertisement.
    #[must_use]
    pub const fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self { ip, port }
    }

    /// Advertised socket address.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.ip, self.port)
    }
}

impl From<SocketAddrV4> for PeerAdvert {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(*addr.ip(), addr.port())
    }
}

/// Encode a PONG body; only the first `MAX_PEER_AD` peers are carried.
#[must_use]
pub fn encode_pong_body(peers: &[PeerAdvert]) -> Bytes {
    let peers = &peers[..peers.len().min(MAX_PEER_AD)];
    let mut body = BytesMut::with_capacity(PONG_PREFIX_LEN + peers.len() * PONG_ENTRY_LEN);
    // At most MAX_PEER_AD entries, always fits in u16.
    body.put_u16(peers.len() as u16);
    body.put_u16(0);
    for peer in peers {
        body.put_u32(peer.ip.to_bits());
        body.put_u16(peer.port);
        body.put_u16(0);
    }
    body.freeze()
}

/// Decode a PONG message into the peers it advertises.
pub fn decode_pong(message: &Message) -> Result<Vec<PeerAdvert>, DecodeError> {
    let found = message.header().msg_type_byte();
    if found != MessageType::Pong.as_u8() {
        return Err(DecodeError::WrongType {
            expected: MessageType::Pong,
            found,
        });
    }

    let mut cursor = FieldCursor::new(message.body());
    let count = usize::from(cursor.read_u16()?);
    cursor.skip(2)?;
    cursor.require(count * PONG_ENTRY_LEN)?;

    let mut peers = Vec::with_capacity(count);
    for _ in 0..count {
        let ip = Ipv4Addr::from_bits(cursor.read_u32()?);
        let port = cursor.read_u16()?;
        cursor.skip(2)?;
        peers.push(PeerAdvert { ip, port });
    }
    if cursor.remaining() != 0 {
        return Err(DecodeError::LengthMismatch {
            expected: cursor.position(),
            found: message.body().len(),
        });
    }
    Ok(peers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageHeader;

    fn pong(body: Bytes) -> Message {
        Message::new(MessageHeader::new(MessageType::Pong, 1, 2, 3), body).unwrap()
    }

    #[test]
    fn test_pong_roundtrip() {
        let peers = vec![
            PeerAdvert::new(Ipv4Addr::new(10, 0, 0, 1), 8601),
            PeerAdvert::from(SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 9), 9000)),
        ];
        let message = pong(encode_pong_body(&peers));
        assert_eq!(usize::from(message.header().length()), 4 + 2 * 8);

        assert_eq!(decode_pong(&message).unwrap(), peers);
    }

    #[test]
    fn test_pong_caps_advertisements() {
        let peers: Vec<_> = (1..=8)
            .map(|n| PeerAdvert::new(Ipv4Addr::new(10, 0, 0, n), 8601))
            .collect();
        let decoded = decode_pong(&pong(encode_pong_body(&peers))).unwrap();

        assert_eq!(decoded.len(), MAX_PEER_AD);
        assert_eq!(decoded[..], peers[..MAX_PEER_AD]);
    }

    #[test]
    fn test_pong_entry_layout() {
        let body = encode_pong_body(&[PeerAdvert::new(Ipv4Addr::new(1, 2, 3, 4), 0x2199)]);
        assert_eq!(body.as_ref(), &[0, 1, 0, 0, 1, 2, 3, 4, 0x21, 0x99, 0, 0]);
    }

    #[test]
    fn test_pong_truncated() {
        let body = Bytes::from_static(&[0, 2, 0, 0, 1, 2, 3, 4, 0x21, 0x99, 0, 0]);
        assert_eq!(
            decode_pong(&pong(body)),
            Err(DecodeError::Truncated {
                needed: 20,
                got: 12
            })
        );
    }

    #[test]
    fn test_pong_trailing_bytes() {
        let peer = PeerAdvert::new(Ipv4Addr::new(1, 2, 3, 4), 8601);
        let mut body = encode_pong_body(&[peer]).to_vec();
        body.extend_from_slice(&[9, 9, 9, 9, 0x21, 0x99, 0, 0]);

        assert_eq!(
            decode_pong(&pong(Bytes::from(body))),
            Err(DecodeError::LengthMismatch {
                expected: 12,
                found: 20
            })
        );
    }

    #[test]
    fn test_pong_wrong_type() {
        let ping = Message::empty(MessageHeader::new(MessageType::Ping, 1, 2, 3));
        assert!(matches!(
            decode_pong(&ping),
            Err(DecodeError::WrongType { found: 0x00, .. })
        ));
    }
}
