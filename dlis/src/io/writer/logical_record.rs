//! DLIS logical record segmentation.

use std::io::{self, Write};

use super::visible_record::VisibleRecord;
use crate::logical_record::{
    Format,
    segment::{self, Attributes, Header},
};

/// The trailer fields added to every segment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Trailer {
    pub checksum: bool,
    pub trailing_length: bool,
}

impl Trailer {
    fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::empty();

        if self.checksum {
            attributes |= Attributes::CHECKSUM;
        }

        if self.trailing_length {
            attributes |= Attributes::TRAILING_LENGTH;
        }

        attributes
    }
}

/// Splits a logical record body into segments and packs them into visible records.
///
/// Segments never span visible records. A full visible record is written to `writer` before a
/// segment that does not fit is started.
pub(crate) fn write_logical_record<W>(
    writer: &mut W,
    visible_record: &mut VisibleRecord,
    trailer: Trailer,
    format: Format,
    is_encrypted: bool,
    record_type: u8,
    body: &[u8],
) -> io::Result<()>
where
    W: Write,
{
    let mut base_attributes = trailer.attributes();

    if format == Format::Explicit {
        base_attributes |= Attributes::EXPLICIT_FORMATTING;
    }

    if is_encrypted {
        base_attributes |= Attributes::ENCRYPTION;
    }

    let trailer_size = base_attributes.trailer_size();

    let mut src = body;
    let mut is_first = true;
    let mut segment = Vec::with_capacity(visible_record.payload_capacity());

    loop {
        let remaining = visible_record.remaining();

        if remaining < segment::MIN_LENGTH {
            visible_record.flush(writer)?;
            continue;
        }

        // Segment lengths are always even, so this is too.
        let max_body_len = remaining - segment::HEADER_SIZE - trailer_size;

        let mut attributes = base_attributes;

        if !is_first {
            attributes |= Attributes::PREDECESSOR;
        }

        let is_last = src.len() <= max_body_len;

        let (chunk, rest) = if is_last {
            (src, &[][..])
        } else {
            attributes |= Attributes::SUCCESSOR;
            src.split_at(max_body_len)
        };

        segment.clear();
        encode_segment(&mut segment, attributes, record_type, chunk)?;
        visible_record.push(&segment);

        if is_last {
            break;
        }

        src = rest;
        is_first = false;
    }

    tracing::trace!(
        format = %format,
        record_type,
        len = body.len(),
        "wrote logical record"
    );

    Ok(())
}

/// Encodes a segment.
///
/// Pad bytes are added if the segment would otherwise be odd in length or shorter than the
/// minimum segment length. The checksum and trailing length are added if set in `attributes`.
pub(crate) fn encode_segment(
    dst: &mut Vec<u8>,
    mut attributes: Attributes,
    record_type: u8,
    body: &[u8],
) -> io::Result<()> {
    let unpadded_len = segment::HEADER_SIZE + body.len() + attributes.trailer_size();
    let pad_count = padding(unpadded_len);

    if pad_count > 0 {
        attributes |= Attributes::PADDING;
    }

    let len = u16::try_from(unpadded_len + pad_count)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let header = Header {
        length: len,
        attributes,
        record_type,
    };

    let start = dst.len();

    dst.extend_from_slice(&header.encode());
    dst.extend_from_slice(body);

    if pad_count > 0 {
        dst.resize(dst.len() + pad_count - 1, 0x00);
        // pad_count < MIN_LENGTH
        dst.push(pad_count as u8);
    }

    if attributes.contains(Attributes::CHECKSUM) {
        let checksum = segment::checksum(&dst[start..]);
        dst.extend_from_slice(&checksum.to_be_bytes());
    }

    if attributes.contains(Attributes::TRAILING_LENGTH) {
        dst.extend_from_slice(&len.to_be_bytes());
    }

    Ok(())
}

fn padding(len: usize) -> usize {
    if len < segment::MIN_LENGTH {
        segment::MIN_LENGTH - len
    } else {
        len % 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        LogicalRecord,
        io::reader::{Outcome, Segmenter},
        logical_record::ChecksumStatus,
    };

    fn read_records(src: &[u8]) -> Vec<LogicalRecord> {
        let mut segmenter = Segmenter::new(true);
        let mut records = Vec::new();

        segmenter.push(src);

        while let Some(outcome) = segmenter.next_outcome().unwrap() {
            match outcome {
                Outcome::Record(record) => records.push(record),
                Outcome::Skipped(diagnostic) => panic!("unexpected diagnostic: {diagnostic:?}"),
            }
        }

        assert!(segmenter.finish().is_none());

        records
    }

    fn strip_visible_record_headers(src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::new();
        let mut rest = src;

        while let Some((header, tail)) = rest.split_first_chunk::<4>() {
            let len = usize::from(u16::from_be_bytes([header[0], header[1]])) - 4;
            assert_eq!(&header[2..], [0xff, 0x01]);

            let (payload, tail) = tail.split_at(len);
            dst.extend_from_slice(payload);
            rest = tail;
        }

        dst
    }

    #[test]
    fn test_encode_segment() -> io::Result<()> {
        let mut buf = Vec::new();
        encode_segment(
            &mut buf,
            Attributes::EXPLICIT_FORMATTING,
            3,
            b"\xf0\x07CHANNEL",
        )?;

        let expected = [
            0x00, 0x10, // length = 16
            0x81, // attributes = EXPLICIT_FORMATTING | PADDING
            0x03, // record type = 3 (CHANNL)
            0xf0, 0x07, b'C', b'H', b'A', b'N', b'N', b'E', b'L', // body
            0x00, 0x00, 0x03, // padding (3 bytes)
        ];

        assert_eq!(buf, expected);

        Ok(())
    }

    #[test]
    fn test_encode_segment_with_trailer() -> io::Result<()> {
        let mut buf = Vec::new();
        encode_segment(
            &mut buf,
            Attributes::CHECKSUM | Attributes::TRAILING_LENGTH,
            0,
            &[0xaa; 13],
        )?;

        // 4 + 13 + 1 (pad) + 2 + 2
        assert_eq!(buf.len(), 22);
        assert_eq!(&buf[..4], [0x00, 0x16, 0x07, 0x00]);
        assert_eq!(buf[17], 0x01);

        let checksum = segment::checksum(&buf[..18]);
        assert_eq!(&buf[18..20], checksum.to_be_bytes());
        assert_eq!(&buf[20..], [0x00, 0x16]);

        Ok(())
    }

    #[test]
    fn test_write_logical_record() -> io::Result<()> {
        fn t(body_len: usize, trailer: Trailer) -> io::Result<()> {
            const VISIBLE_RECORD_LENGTH: usize = 64;

            let body: Vec<u8> = (0..body_len).map(|i| i as u8).collect();

            let mut buf = Vec::new();
            let mut visible_record = VisibleRecord::new(VISIBLE_RECORD_LENGTH);

            write_logical_record(&mut buf, &mut visible_record, trailer, Format::Explicit, false, 5, &body)?;
            write_logical_record(&mut buf, &mut visible_record, trailer, Format::Indirect, true, 1, &[])?;
            visible_record.flush(&mut buf)?;

            let mut rest = &buf[..];

            while let Some(header) = rest.first_chunk::<2>() {
                let len = usize::from(u16::from_be_bytes(*header));
                assert!(len <= VISIBLE_RECORD_LENGTH);
                rest = &rest[len..];
            }

            let stream = strip_visible_record_headers(&buf);
            let records = read_records(&stream);

            assert_eq!(records.len(), 2);

            assert_eq!(records[0].format(), Format::Explicit);
            assert_eq!(records[0].record_type(), 5);
            assert_eq!(records[0].body(), body);

            assert_eq!(records[1].format(), Format::Indirect);
            assert!(records[1].is_encrypted());
            assert!(records[1].body().is_empty());

            let expected_checksum_status = if trailer.checksum {
                ChecksumStatus::Valid
            } else {
                ChecksumStatus::Unchecked
            };

            assert_eq!(records[0].checksum_status(), expected_checksum_status);

            Ok(())
        }

        for body_len in [0, 1, 11, 12, 55, 56, 57, 200] {
            t(body_len, Trailer::default())?;

            t(
                body_len,
                Trailer {
                    checksum: true,
                    trailing_length: true,
                },
            )?;
        }

        Ok(())
    }
}
