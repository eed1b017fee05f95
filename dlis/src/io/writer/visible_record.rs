//! DLIS visible record writer.

use std::io::{self, Write};

use super::num::write_u16_be;
use crate::io::reader::visible_record::{FORMAT_VERSION, HEADER_SIZE};

/// Writes a visible record header for a payload of the given length.
///
/// # Examples
///
/// ```
/// use dlis::io::writer::visible_record::write_header;
///
/// let mut buf = Vec::new();
/// write_header(&mut buf, 2)?;
/// assert_eq!(buf, [0x00, 0x06, 0xff, 0x01]);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_header<W>(writer: &mut W, payload_len: usize) -> io::Result<()>
where
    W: Write,
{
    let len = u16::try_from(HEADER_SIZE + payload_len)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    write_u16_be(writer, len)?;
    write_u16_be(writer, FORMAT_VERSION)
}

/// A visible record that is filled with whole logical record segments.
#[derive(Debug)]
pub(crate) struct VisibleRecord {
    payload_capacity: usize,
    buf: Vec<u8>,
}

impl VisibleRecord {
    pub fn new(len: usize) -> Self {
        let payload_capacity = len - HEADER_SIZE;

        Self {
            payload_capacity,
            buf: Vec::with_capacity(payload_capacity),
        }
    }

    pub fn payload_capacity(&self) -> usize {
        self.payload_capacity
    }

    /// Returns the number of payload bytes still available.
    pub fn remaining(&self) -> usize {
        self.payload_capacity - self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push(&mut self, segment: &[u8]) {
        debug_assert!(segment.len() <= self.remaining());
        self.buf.extend_from_slice(segment);
    }

    /// Writes the visible record, if it is not empty, and clears it.
    pub fn flush<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        if self.buf.is_empty() {
            return Ok(());
        }

        write_header(writer, self.buf.len())?;
        writer.write_all(&self.buf)?;

        tracing::trace!(len = HEADER_SIZE + self.buf.len(), "wrote visible record");

        self.buf.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush() -> io::Result<()> {
        let mut visible_record = VisibleRecord::new(20);
        assert_eq!(visible_record.remaining(), 16);

        let mut buf = Vec::new();
        visible_record.flush(&mut buf)?;
        assert!(buf.is_empty());

        visible_record.push(&[0xaa; 6]);
        assert_eq!(visible_record.remaining(), 10);

        visible_record.flush(&mut buf)?;
        assert_eq!(buf, [0x00, 0x0a, 0xff, 0x01, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa]);
        assert!(visible_record.is_empty());

        Ok(())
    }
}
