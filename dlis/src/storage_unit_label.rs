//! DLIS storage unit label.

mod version;

pub use self::version::Version;

use bstr::{BStr, BString};

/// The size of a storage unit label in bytes.
pub const SIZE: usize = 80;

/// The storage unit structure of a record-structured storage unit.
pub(crate) const STRUCTURE: &[u8; 6] = b"RECORD";

/// The largest visible record length RP66 V1 allows.
pub const MAX_RECORD_LENGTH: usize = 16384;

/// The length of the storage set identifier field.
pub const STORAGE_SET_IDENTIFIER_LENGTH: usize = 60;

/// A DLIS storage unit label.
///
/// This is the 80-byte ASCII header at the start of every storage unit (physical file).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageUnitLabel {
    pub(crate) sequence_number: u16,
    pub(crate) version: Version,
    pub(crate) maximum_record_length: u16,
    pub(crate) storage_set_identifier: BString,
}

impl StorageUnitLabel {
    /// Creates a storage unit label.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{StorageUnitLabel, storage_unit_label::Version};
    /// let label = StorageUnitLabel::new(1, Version::V1_0, 8192, "Default Storage Set");
    /// assert_eq!(label.sequence_number(), 1);
    /// ```
    pub fn new<S>(
        sequence_number: u16,
        version: Version,
        maximum_record_length: u16,
        storage_set_identifier: S,
    ) -> Self
    where
        S: Into<BString>,
    {
        Self {
            sequence_number,
            version,
            maximum_record_length,
            storage_set_identifier: storage_set_identifier.into(),
        }
    }

    /// Returns the storage unit sequence number.
    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    /// Returns the DLIS version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the maximum visible record length.
    ///
    /// 0 means the length is undeclared.
    pub fn maximum_record_length(&self) -> u16 {
        self.maximum_record_length
    }

    /// Returns the storage set identifier, without trailing padding.
    pub fn storage_set_identifier(&self) -> &BStr {
        self.storage_set_identifier.as_ref()
    }
}

impl Default for StorageUnitLabel {
    fn default() -> Self {
        Self::new(1, Version::default(), 8192, "")
    }
}
