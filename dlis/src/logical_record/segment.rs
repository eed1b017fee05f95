//! DLIS logical record segments.

use bitflags::bitflags;

/// The size of a logical record segment header in bytes.
pub const HEADER_SIZE: usize = 4;

/// The smallest valid logical record segment length.
pub const MIN_LENGTH: usize = 16;

bitflags! {
    /// Logical record segment attributes.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Attributes: u8 {
        /// The segment belongs to an explicitly formatted logical record.
        const EXPLICIT_FORMATTING = 0x80;
        /// The segment is not the first segment of its logical record.
        const PREDECESSOR = 0x40;
        /// The segment is not the last segment of its logical record.
        const SUCCESSOR = 0x20;
        /// The segment body is encrypted.
        const ENCRYPTION = 0x10;
        /// The segment body starts with an encryption packet.
        const ENCRYPTION_PACKET = 0x08;
        /// The segment trailer contains a checksum.
        const CHECKSUM = 0x04;
        /// The segment trailer ends with a copy of the segment length.
        const TRAILING_LENGTH = 0x02;
        /// The segment body is followed by pad bytes.
        const PADDING = 0x01;
    }
}

impl Attributes {
    /// Returns the size of the segment trailer (checksum and trailing length) in bytes.
    pub fn trailer_size(&self) -> usize {
        let mut n = 0;

        if self.contains(Self::CHECKSUM) {
            n += 2;
        }

        if self.contains(Self::TRAILING_LENGTH) {
            n += 2;
        }

        n
    }
}

/// A logical record segment header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Header {
    /// The segment length, including the header.
    pub length: u16,
    /// The segment attributes.
    pub attributes: Attributes,
    /// The logical record type.
    pub record_type: u8,
}

impl Header {
    /// Encodes the segment header.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::logical_record::segment::{Attributes, Header};
    ///
    /// let header = Header::from([0x00, 0x7c, 0x80, 0x00]);
    /// assert_eq!(header.length, 124);
    /// assert_eq!(header.attributes, Attributes::EXPLICIT_FORMATTING);
    /// assert_eq!(header.record_type, 0);
    ///
    /// assert_eq!(header.encode(), [0x00, 0x7c, 0x80, 0x00]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let [a, b] = self.length.to_be_bytes();
        [a, b, self.attributes.bits(), self.record_type]
    }
}

impl From<[u8; HEADER_SIZE]> for Header {
    fn from(buf: [u8; HEADER_SIZE]) -> Self {
        Self {
            length: u16::from_be_bytes([buf[0], buf[1]]),
            attributes: Attributes::from_bits_retain(buf[2]),
            record_type: buf[3],
        }
    }
}

/// Computes the checksum of a segment.
///
/// `src` is everything that precedes the checksum field: the segment header, body, and pad
/// bytes. Bytes are summed as big-endian pairs (an odd trailing byte is paired with zero), and
/// the 16-bit accumulator is rotated left one bit after each addition.
///
/// # Examples
///
/// ```
/// use dlis::logical_record::segment::checksum;
/// assert_eq!(checksum(&[0x00, 0x01]), 0x0002);
/// assert_eq!(checksum(&[0x00, 0x01, 0x00, 0x01]), 0x0006);
/// ```
pub fn checksum(src: &[u8]) -> u16 {
    let mut sum = 0u16;

    for chunk in src.chunks(2) {
        let word = match *chunk {
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            [hi] => u16::from_be_bytes([hi, 0x00]),
            _ => unreachable!(),
        };

        sum = sum.wrapping_add(word).rotate_left(1);
    }

    sum
}
