//! DLIS logical record reassembly.

use std::{error, fmt, mem};

use super::visible_record::FramingError;
use crate::{
    Diagnostic, LogicalRecord,
    logical_record::{
        ChecksumStatus, Format,
        segment::{self, Attributes, Header},
    },
};

/// An error returned when a logical record segment is malformed.
///
/// A segment error is scoped to one logical record. The record is skipped, and reading resumes
/// after the segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SegmentError {
    /// The segment length is less than 16 or odd.
    InvalidLength(u16),
    /// The segment is too short to hold its trailer.
    MissingTrailer,
    /// The pad count is 0 or larger than the segment body.
    InvalidPadCount(u8),
    /// The trailing length does not match the segment length.
    TrailingLengthMismatch {
        /// The segment length from the header.
        expected: u16,
        /// The trailing length.
        actual: u16,
    },
    /// A segment continues a record that was never started.
    UnexpectedPredecessor,
    /// A record ended before its last segment.
    MissingSuccessor,
    /// A segment has a different format or record type than the record it continues.
    InconsistentSegments,
}

impl error::Error for SegmentError {}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => write!(f, "invalid segment length: {n}"),
            Self::MissingTrailer => f.write_str("segment too short for trailer"),
            Self::InvalidPadCount(n) => write!(f, "invalid pad count: {n}"),
            Self::TrailingLengthMismatch { expected, actual } => write!(
                f,
                "trailing length mismatch: expected {expected}, got {actual}"
            ),
            Self::UnexpectedPredecessor => f.write_str("segment has no predecessor"),
            Self::MissingSuccessor => f.write_str("record ended before its last segment"),
            Self::InconsistentSegments => f.write_str("segment does not match its record"),
        }
    }
}

/// A decoded logical record segment.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Segment<'a> {
    pub header: Header,
    pub body: &'a [u8],
    pub checksum_status: ChecksumStatus,
}

/// Decodes a logical record segment.
///
/// `src` is the entire segment, including the header. The body is stripped of pad bytes and the
/// trailer.
pub(crate) fn parse_segment(src: &[u8], validate_checksums: bool) -> Result<Segment<'_>, SegmentError> {
    let Some((buf, rest)) = src.split_first_chunk::<{ segment::HEADER_SIZE }>() else {
        return Err(SegmentError::MissingTrailer);
    };

    let header = Header::from(*buf);
    let len = usize::from(header.length);

    if len < segment::MIN_LENGTH || len % 2 != 0 {
        return Err(SegmentError::InvalidLength(header.length));
    }

    let attributes = header.attributes;

    let body_len = rest
        .len()
        .checked_sub(attributes.trailer_size())
        .ok_or(SegmentError::MissingTrailer)?;

    let (mut body, mut trailer) = rest.split_at(body_len);

    let mut checksum_status = ChecksumStatus::Unchecked;

    if let Some((buf, rest)) = attributes
        .contains(Attributes::CHECKSUM)
        .then(|| trailer.split_first_chunk::<2>())
        .flatten()
    {
        if validate_checksums {
            let expected = segment::checksum(&src[..segment::HEADER_SIZE + body_len]);
            let actual = u16::from_be_bytes(*buf);

            checksum_status = if actual == expected {
                ChecksumStatus::Valid
            } else {
                ChecksumStatus::Invalid
            };
        }

        trailer = rest;
    }

    if attributes.contains(Attributes::TRAILING_LENGTH)
        && let Some(buf) = trailer.first_chunk::<2>()
    {
        let actual = u16::from_be_bytes(*buf);

        if actual != header.length {
            return Err(SegmentError::TrailingLengthMismatch {
                expected: header.length,
                actual,
            });
        }
    }

    if attributes.contains(Attributes::PADDING) {
        let pad_count = body.last().copied().unwrap_or_default();
        let n = usize::from(pad_count);

        if n == 0 || n > body.len() {
            return Err(SegmentError::InvalidPadCount(pad_count));
        }

        body = &body[..body.len() - n];
    }

    Ok(Segment {
        header,
        body,
        checksum_status,
    })
}

/// The result of reassembling one logical record.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// A complete logical record.
    Record(LogicalRecord),
    /// A record that could not be reassembled.
    Skipped(Diagnostic),
}

enum Step {
    Incomplete,
    Consumed(Option<Outcome>),
}

#[derive(Debug)]
struct Partial {
    record: LogicalRecord,
    attributes: Attributes,
}

/// Reassembles logical records from the logical byte stream.
///
/// The stream is pushed in chunks (visible record payloads). Segments may span chunk boundaries.
#[derive(Debug, Default)]
pub(crate) struct Segmenter {
    buf: Vec<u8>,
    start: usize,
    position: u64,
    partial: Option<Partial>,
    is_discarding: bool,
    ready: Option<Outcome>,
    validate_checksums: bool,
}

impl Segmenter {
    pub fn new(validate_checksums: bool) -> Self {
        Self {
            validate_checksums,
            ..Default::default()
        }
    }

    /// Returns the offset of the next unread byte in the logical byte stream.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Appends bytes to the logical byte stream.
    pub fn push(&mut self, src: &[u8]) {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }

        self.buf.extend_from_slice(src);
    }

    /// Returns the next outcome, or `None` if more of the stream is needed.
    pub fn next_outcome(&mut self) -> Result<Option<Outcome>, FramingError> {
        if let Some(outcome) = self.ready.take() {
            return Ok(Some(outcome));
        }

        loop {
            let buf = mem::take(&mut self.buf);
            let result = self.read_segment(&buf);
            self.buf = buf;

            match result? {
                Step::Incomplete => return Ok(None),
                Step::Consumed(Some(outcome)) => return Ok(Some(outcome)),
                Step::Consumed(None) => {}
            }
        }
    }

    fn read_segment(&mut self, buf: &[u8]) -> Result<Step, FramingError> {
        let src = &buf[self.start..];

        let Some(header_buf) = src.first_chunk::<{ segment::HEADER_SIZE }>() else {
            return Ok(Step::Incomplete);
        };

        let header = Header::from(*header_buf);
        let len = usize::from(header.length);

        if len < segment::HEADER_SIZE {
            return Err(FramingError::InvalidSegmentLength(header.length));
        }

        if src.len() < len {
            return Ok(Step::Incomplete);
        }

        let position = self.position;

        self.start += len;
        self.position += len as u64;

        let outcome = match parse_segment(&src[..len], self.validate_checksums) {
            Ok(segment) => self.add_segment(position, segment),
            Err(e) => Some(self.discard(position, header.attributes, e)),
        };

        Ok(Step::Consumed(outcome))
    }

    /// Ends the stream.
    ///
    /// This returns a truncation diagnostic if the stream ends in the middle of a logical
    /// record.
    pub fn finish(&mut self) -> Option<Outcome> {
        if let Some(outcome) = self.ready.take() {
            return Some(outcome);
        }

        let has_leftover = self.start < self.buf.len();
        self.buf.clear();
        self.start = 0;

        let position = match self.partial.take() {
            Some(partial) => partial.record.position,
            None if has_leftover => self.position,
            None => return None,
        };

        Some(Outcome::Skipped(Diagnostic::TruncatedRecord { position }))
    }

    fn add_segment(&mut self, position: u64, segment: Segment<'_>) -> Option<Outcome> {
        let attributes = segment.header.attributes;
        let is_first = !attributes.contains(Attributes::PREDECESSOR);
        let is_last = !attributes.contains(Attributes::SUCCESSOR);

        if self.is_discarding {
            if is_first {
                self.is_discarding = false;
            } else {
                self.is_discarding = !is_last;
                return None;
            }
        }

        let mut skipped = None;

        if is_first {
            if let Some(partial) = self.partial.take() {
                skipped = Some(invalid_segment(partial.record.position, SegmentError::MissingSuccessor));
            }

            let format = if attributes.contains(Attributes::EXPLICIT_FORMATTING) {
                Format::Explicit
            } else {
                Format::Indirect
            };

            let record = LogicalRecord {
                format,
                record_type: segment.header.record_type,
                is_encrypted: attributes.contains(Attributes::ENCRYPTION),
                checksum_status: ChecksumStatus::Unchecked,
                position,
                body: Vec::new(),
            };

            self.partial = Some(Partial { record, attributes });
        }

        let Some(partial) = self.partial.as_mut() else {
            self.is_discarding = !is_last;
            return Some(invalid_segment(position, SegmentError::UnexpectedPredecessor));
        };

        let mask = Attributes::EXPLICIT_FORMATTING | Attributes::ENCRYPTION;

        if (attributes & mask) != (partial.attributes & mask)
            || segment.header.record_type != partial.record.record_type
        {
            let record_position = partial.record.position;
            self.partial = None;
            self.is_discarding = !is_last;
            return Some(invalid_segment(record_position, SegmentError::InconsistentSegments));
        }

        partial.record.body.extend_from_slice(segment.body);

        partial.record.checksum_status = match (partial.record.checksum_status, segment.checksum_status)
        {
            (ChecksumStatus::Invalid, _) | (_, ChecksumStatus::Invalid) => ChecksumStatus::Invalid,
            (ChecksumStatus::Valid, _) | (_, ChecksumStatus::Valid) => ChecksumStatus::Valid,
            _ => ChecksumStatus::Unchecked,
        };

        if is_last {
            let record = self.partial.take().map(|partial| partial.record)?;

            tracing::debug!(
                position = record.position,
                format = %record.format,
                record_type = record.record_type,
                len = record.body.len(),
                "read logical record"
            );

            let outcome = Outcome::Record(record);

            return match skipped {
                Some(skipped) => {
                    self.ready = Some(outcome);
                    Some(skipped)
                }
                None => Some(outcome),
            };
        }

        skipped
    }

    fn discard(&mut self, position: u64, attributes: Attributes, e: SegmentError) -> Outcome {
        let is_last = !attributes.contains(Attributes::SUCCESSOR);

        let position = match self.partial.take() {
            Some(partial) if attributes.contains(Attributes::PREDECESSOR) => partial.record.position,
            Some(partial) => {
                // The segment starts a new record, so the pending record is incomplete.
                self.ready = Some(invalid_segment(position, e));
                self.is_discarding = !is_last;
                return invalid_segment(partial.record.position, SegmentError::MissingSuccessor);
            }
            None => position,
        };

        self.is_discarding = !is_last;
        invalid_segment(position, e)
    }
}

fn invalid_segment(position: u64, e: SegmentError) -> Outcome {
    Outcome::Skipped(Diagnostic::InvalidSegment {
        position,
        message: e.to_string(),
    })
}
