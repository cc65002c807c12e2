//! Bounds-checked field reader for message bodies.

use bytes::Buf;

use super::DecodeError;

/// Cursor over a message body that advances by declared field widths.
///
/// Every read checks the remaining length first, so a short body yields
/// [`DecodeError::Truncated`] instead of reading past the buffer.
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    rest: &'a [u8],
    total: usize,
}

impl<'a> FieldCursor<'a> {
    /// Start reading at the front of `body`.
    #[must_use]
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            rest: body,
            total: body.len(),
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.total - self.rest.remaining()
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rest.remaining()
    }

    /// Fail unless at least `width` more bytes are available.
    pub fn require(&self, width: usize) -> Result<(), DecodeError> {
        if self.rest.remaining() < width {
            return Err(DecodeError::Truncated {
                needed: self.position().saturating_add(width),
                got: self.total,
            });
        }
        Ok(())
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.require(2)?;
        Ok(self.rest.get_u16())
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.require(4)?;
        Ok(self.rest.get_u32())
    }

    /// Skip `width` bytes of padding.
    pub fn skip(&mut self, width: usize) -> Result<(), DecodeError> {
        self.require(width)?;
        self.rest.advance(width);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance() {
        let body = [0x00, 0x02, 0xAA, 0xBB, 0x00, 0x00, 0x01, 0x00];
        let mut cursor = FieldCursor::new(&body);

        assert_eq!(cursor.read_u16().unwrap(), 2);
        cursor.skip(2).unwrap();
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_u32().unwrap(), 256);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_underrun_does_not_advance() {
        let body = [0x01, 0x02, 0x03];
        let mut cursor = FieldCursor::new(&body);
        cursor.skip(1).unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err, DecodeError::Truncated { needed: 5, got: 3 });
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x0203);
    }

    #[test]
    fn test_empty_body() {
        let mut cursor = FieldCursor::new(&[]);
        assert!(cursor.require(0).is_ok());
        assert!(matches!(
            cursor.read_u16(),
            Err(DecodeError::Truncated { needed: 2, got: 0 })
        ));
    }
}
