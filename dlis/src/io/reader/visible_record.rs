//! DLIS visible record reader.

use std::{
    error, fmt,
    io::{self, Read},
};

/// The size of a visible record header in bytes.
pub const HEADER_SIZE: usize = 4;

/// The format version marker of an RP66 V1 visible record.
pub const FORMAT_VERSION: u16 = 0xff01;

/// An error returned when the physical framing of a file is malformed.
///
/// There is no recovery point after a framing error, so it ends the read of the physical file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FramingError {
    /// The visible record length is smaller than its header.
    InvalidLength(u16),
    /// The format version marker is not `0xFF01`.
    InvalidFormatVersion(u16),
    /// The storage unit label is malformed.
    InvalidStorageUnitLabel(&'static str),
    /// A logical record segment length is smaller than its header.
    InvalidSegmentLength(u16),
}

impl error::Error for FramingError {}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => write!(f, "invalid visible record length: {n}"),
            Self::InvalidFormatVersion(n) => {
                write!(f, "invalid visible record format version: {n:#06x}")
            }
            Self::InvalidStorageUnitLabel(field) => {
                write!(f, "invalid storage unit label: invalid {field}")
            }
            Self::InvalidSegmentLength(n) => {
                write!(f, "invalid logical record segment length: {n}")
            }
        }
    }
}

impl From<FramingError> for io::Error {
    fn from(e: FramingError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// Reads a visible record header and returns the payload length.
///
/// This returns `None` at EOF. A header cut short by EOF is also treated as EOF.
pub(crate) fn read_header<R>(reader: &mut R) -> io::Result<Option<usize>>
where
    R: Read,
{
    let mut buf = [0; HEADER_SIZE];
    let mut n = 0;

    while n < buf.len() {
        match reader.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(m) => n += m,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    match n {
        0 => Ok(None),
        HEADER_SIZE => parse_header(buf).map(Some),
        _ => {
            tracing::warn!(len = n, "truncated visible record header");
            Ok(None)
        }
    }
}

pub(crate) fn parse_header(buf: [u8; HEADER_SIZE]) -> io::Result<usize> {
    let [a, b, c, d] = buf;

    let len = u16::from_be_bytes([a, b]);
    let format_version = u16::from_be_bytes([c, d]);

    if usize::from(len) < HEADER_SIZE {
        return Err(FramingError::InvalidLength(len).into());
    }

    if format_version != FORMAT_VERSION {
        return Err(FramingError::InvalidFormatVersion(format_version).into());
    }

    Ok(usize::from(len) - HEADER_SIZE)
}

/// Reads a visible record payload into `buf`.
///
/// This returns the length of the payload read, or `None` at EOF. A visible record can have an
/// empty payload. If the stream ends before the declared payload length, the bytes that are
/// available are returned.
///
/// # Examples
///
/// ```
/// use dlis::io::reader::visible_record::read_visible_record;
///
/// let data = [
///     0x00, 0x06, 0xff, 0x01, // length = 6, format version = 0xff01
///     0x01, 0x02, // payload
///     0x00, 0x04, 0xff, 0x01, // length = 4, format version = 0xff01
/// ];
/// let mut reader = &data[..];
///
/// let mut buf = Vec::new();
/// assert_eq!(read_visible_record(&mut reader, &mut buf)?, Some(2));
/// assert_eq!(buf, [0x01, 0x02]);
///
/// assert_eq!(read_visible_record(&mut reader, &mut buf)?, Some(0));
/// assert_eq!(read_visible_record(&mut reader, &mut buf)?, None);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn read_visible_record<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<usize>>
where
    R: Read,
{
    buf.clear();

    let Some(len) = read_header(reader)? else {
        return Ok(None);
    };

    let n = reader.take(len as u64).read_to_end(buf)?;

    if n < len {
        tracing::warn!(expected = len, actual = n, "truncated visible record");
    }

    Ok(Some(n))
}
