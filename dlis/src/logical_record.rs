//! DLIS logical records.

pub mod segment;

use std::fmt;

/// A logical record format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Format {
    /// An explicitly formatted logical record (EFLR). The body is a set of components.
    #[default]
    Explicit,
    /// An indirectly formatted logical record (IFLR). The body is bulk data.
    Indirect,
}

/// An explicitly formatted logical record type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExplicitType {
    /// File header (`FHLR`, 0).
    FileHeader,
    /// Origin (`OLR`, 1).
    Origin,
    /// Coordinate axis (`AXIS`, 2).
    Axis,
    /// Channel definition (`CHANNL`, 3).
    Channel,
    /// Frame definition (`FRAME`, 4).
    Frame,
    /// Static data (`STATIC`, 5).
    Static,
    /// Textual data (`SCRIPT`, 6).
    Script,
    /// Update data (`UPDATE`, 7).
    Update,
    /// Unformatted data identifier (`UDI`, 8).
    UnformattedDataIdentifier,
    /// Long name (`LNAME`, 9).
    LongName,
    /// Specification (`SPEC`, 10).
    Specification,
    /// Dictionary (`DICT`, 11).
    Dictionary,
    /// A private or undefined type.
    Other(u8),
}

impl ExplicitType {
    /// Returns the logical record type a set of the given type is written in.
    ///
    /// Set types not listed by RP66 V1 are written as static data.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::logical_record::ExplicitType;
    /// assert_eq!(ExplicitType::for_set_type(b"CHANNEL"), ExplicitType::Channel);
    /// assert_eq!(ExplicitType::for_set_type(b"TOOL"), ExplicitType::Static);
    /// ```
    pub fn for_set_type(set_type: &[u8]) -> Self {
        match set_type {
            b"FILE-HEADER" => Self::FileHeader,
            b"ORIGIN" | b"WELL-REFERENCE" => Self::Origin,
            b"AXIS" => Self::Axis,
            b"CHANNEL" => Self::Channel,
            b"FRAME" | b"PATH" => Self::Frame,
            b"COMMENT" | b"MESSAGE" => Self::Script,
            b"UPDATE" => Self::Update,
            b"NO-FORMAT" => Self::UnformattedDataIdentifier,
            b"LONG-NAME" => Self::LongName,
            b"ATTRIBUTE" | b"CODE" | b"EFLR" | b"IFLR" | b"OBJECT-TYPE"
            | b"REPRESENTATION-CODE" | b"SPECIFICATION" | b"UNIT-SYMBOL" => Self::Specification,
            b"BASE-DICTIONARY" | b"IDENTIFIER" | b"LEXICON" | b"OPTION" => Self::Dictionary,
            _ => Self::Static,
        }
    }
}

impl From<u8> for ExplicitType {
    fn from(n: u8) -> Self {
        match n {
            0 => Self::FileHeader,
            1 => Self::Origin,
            2 => Self::Axis,
            3 => Self::Channel,
            4 => Self::Frame,
            5 => Self::Static,
            6 => Self::Script,
            7 => Self::Update,
            8 => Self::UnformattedDataIdentifier,
            9 => Self::LongName,
            10 => Self::Specification,
            11 => Self::Dictionary,
            _ => Self::Other(n),
        }
    }
}

impl From<ExplicitType> for u8 {
    fn from(ty: ExplicitType) -> Self {
        match ty {
            ExplicitType::FileHeader => 0,
            ExplicitType::Origin => 1,
            ExplicitType::Axis => 2,
            ExplicitType::Channel => 3,
            ExplicitType::Frame => 4,
            ExplicitType::Static => 5,
            ExplicitType::Script => 6,
            ExplicitType::Update => 7,
            ExplicitType::UnformattedDataIdentifier => 8,
            ExplicitType::LongName => 9,
            ExplicitType::Specification => 10,
            ExplicitType::Dictionary => 11,
            ExplicitType::Other(n) => n,
        }
    }
}

/// An indirectly formatted logical record type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndirectType {
    /// Frame data (`FDATA`, 0).
    FrameData,
    /// Unformatted data (`NOFORM`, 1).
    NoFormat,
    /// End of data (`EOD`, 127).
    EndOfData,
    /// A private or undefined type.
    Other(u8),
}

impl From<u8> for IndirectType {
    fn from(n: u8) -> Self {
        match n {
            0 => Self::FrameData,
            1 => Self::NoFormat,
            127 => Self::EndOfData,
            _ => Self::Other(n),
        }
    }
}

impl From<IndirectType> for u8 {
    fn from(ty: IndirectType) -> Self {
        match ty {
            IndirectType::FrameData => 0,
            IndirectType::NoFormat => 1,
            IndirectType::EndOfData => 127,
            IndirectType::Other(n) => n,
        }
    }
}

/// The result of validating the checksums of a logical record's segments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChecksumStatus {
    /// No segment carries a checksum, or validation is disabled.
    #[default]
    Unchecked,
    /// Every checksummed segment matches.
    Valid,
    /// At least one segment checksum does not match.
    Invalid,
}

/// A DLIS logical record.
///
/// This is the concatenation of one or more logical record segment bodies, stripped of padding
/// and trailers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogicalRecord {
    pub(crate) format: Format,
    pub(crate) record_type: u8,
    pub(crate) is_encrypted: bool,
    pub(crate) checksum_status: ChecksumStatus,
    pub(crate) position: u64,
    pub(crate) body: Vec<u8>,
}

impl LogicalRecord {
    /// Creates a logical record.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{LogicalRecord, logical_record::Format};
    /// let record = LogicalRecord::new(Format::Indirect, 0, vec![0x00]);
    /// assert_eq!(record.body(), [0x00]);
    /// ```
    pub fn new(format: Format, record_type: u8, body: Vec<u8>) -> Self {
        Self {
            format,
            record_type,
            body,
            ..Default::default()
        }
    }

    /// Returns the record format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns whether this is an explicitly formatted logical record.
    pub fn is_explicit(&self) -> bool {
        self.format == Format::Explicit
    }

    /// Returns the raw record type.
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Returns the explicitly formatted record type, if this is an EFLR.
    pub fn explicit_type(&self) -> Option<ExplicitType> {
        self.is_explicit().then(|| ExplicitType::from(self.record_type))
    }

    /// Returns the indirectly formatted record type, if this is an IFLR.
    pub fn indirect_type(&self) -> Option<IndirectType> {
        (!self.is_explicit()).then(|| IndirectType::from(self.record_type))
    }

    /// Returns whether the record body is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.is_encrypted
    }

    /// Returns the checksum validation result.
    pub fn checksum_status(&self) -> ChecksumStatus {
        self.checksum_status
    }

    /// Returns the offset of the first segment in the logical byte stream.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the record body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("EFLR"),
            Self::Indirect => f.write_str("IFLR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_type_conversions() {
        for n in 0..=11 {
            assert_eq!(u8::from(ExplicitType::from(n)), n);
        }

        assert_eq!(ExplicitType::from(200), ExplicitType::Other(200));
    }

    #[test]
    fn test_indirect_type_conversions() {
        assert_eq!(IndirectType::from(0), IndirectType::FrameData);
        assert_eq!(IndirectType::from(1), IndirectType::NoFormat);
        assert_eq!(IndirectType::from(127), IndirectType::EndOfData);
        assert_eq!(IndirectType::from(9), IndirectType::Other(9));
        assert_eq!(u8::from(IndirectType::EndOfData), 127);
    }

    #[test]
    fn test_for_set_type() {
        assert_eq!(
            ExplicitType::for_set_type(b"FILE-HEADER"),
            ExplicitType::FileHeader
        );
        assert_eq!(ExplicitType::for_set_type(b"ORIGIN"), ExplicitType::Origin);
        assert_eq!(ExplicitType::for_set_type(b"FRAME"), ExplicitType::Frame);
        assert_eq!(
            ExplicitType::for_set_type(b"UNIT-SYMBOL"),
            ExplicitType::Specification
        );
        assert_eq!(ExplicitType::for_set_type(b"ZONE"), ExplicitType::Static);
    }

    #[test]
    fn test_record_types() {
        let record = LogicalRecord::new(Format::Explicit, 3, Vec::new());
        assert_eq!(record.explicit_type(), Some(ExplicitType::Channel));
        assert!(record.indirect_type().is_none());

        let record = LogicalRecord::new(Format::Indirect, 0, Vec::new());
        assert!(record.explicit_type().is_none());
        assert_eq!(record.indirect_type(), Some(IndirectType::FrameData));
    }
}
