//! DLIS logical files.

use crate::{Frame, Set, set::types, value::ObjectName};

/// An encrypted logical record.
///
/// Encrypted records are never decoded. The body is the raw record body, including the
/// encryption packet when there is one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedRecord {
    pub(crate) is_explicit: bool,
    pub(crate) record_type: u8,
    pub(crate) body: Vec<u8>,
}

impl EncryptedRecord {
    /// Creates an encrypted record.
    pub fn new(is_explicit: bool, record_type: u8, body: Vec<u8>) -> Self {
        Self {
            is_explicit,
            record_type,
            body,
        }
    }

    /// Returns whether the record is explicitly formatted.
    pub fn is_explicit(&self) -> bool {
        self.is_explicit
    }

    /// Returns the logical record type.
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Returns the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// An indirectly formatted logical record that is not frame data.
///
/// This includes unformatted data (`NOFORM`), end of data (`EOD`), and private types. The body is
/// kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndirectRecord {
    pub(crate) record_type: u8,
    pub(crate) body: Vec<u8>,
}

impl IndirectRecord {
    /// Creates an indirect record.
    pub fn new(record_type: u8, body: Vec<u8>) -> Self {
        Self { record_type, body }
    }

    /// Returns the logical record type.
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Returns the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// A DLIS logical file.
///
/// A logical file starts with a `FILE-HEADER` set and owns every set, frame, and opaque record
/// up to the next `FILE-HEADER` set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogicalFile {
    pub(crate) sets: Vec<Set>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) encrypted_records: Vec<EncryptedRecord>,
    pub(crate) indirect_records: Vec<IndirectRecord>,
}

impl LogicalFile {
    /// Creates a logical file.
    ///
    /// Sets are written in the given order. Frames are described by `CHANNEL` and `FRAME` sets
    /// that the caller includes in `sets` (see [`crate::frame::build_channel_set`] and
    /// [`crate::frame::build_frame_set`]).
    pub fn new(sets: Vec<Set>, frames: Vec<Frame>) -> Self {
        Self {
            sets,
            frames,
            ..Default::default()
        }
    }

    /// Sets the encrypted records.
    pub fn with_encrypted_records(mut self, encrypted_records: Vec<EncryptedRecord>) -> Self {
        self.encrypted_records = encrypted_records;
        self
    }

    /// Sets the indirect records.
    pub fn with_indirect_records(mut self, indirect_records: Vec<IndirectRecord>) -> Self {
        self.indirect_records = indirect_records;
        self
    }

    /// Returns the sets, in the order they were read.
    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    /// Returns the `FILE-HEADER` set.
    ///
    /// This is `None` for the implicit logical file that holds records preceding the first
    /// `FILE-HEADER`.
    pub fn file_header(&self) -> Option<&Set> {
        self.sets.iter().find(|set| set.is_file_header())
    }

    /// Returns the `ORIGIN` sets.
    pub fn origins(&self) -> impl Iterator<Item = &Set> {
        self.sets_of_type(types::ORIGIN)
    }

    /// Returns the `CHANNEL` sets.
    pub fn channels(&self) -> impl Iterator<Item = &Set> {
        self.sets_of_type(types::CHANNEL)
    }

    /// Returns the sets with the given type.
    pub fn sets_of_type<'a>(&'a self, set_type: &'a [u8]) -> impl Iterator<Item = &'a Set> {
        self.sets.iter().filter(move |set| set.set_type() == set_type)
    }

    /// Returns the set with the given type and name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{LogicalFile, Set, set::Template};
    ///
    /// let set = Set::new("TOOL", Some("T1".into()), Template::default(), Vec::new());
    /// let logical_file = LogicalFile::new(vec![set], Vec::new());
    ///
    /// assert!(logical_file.find_set(b"TOOL", Some(b"T1")).is_some());
    /// assert!(logical_file.find_set(b"TOOL", None).is_none());
    /// ```
    pub fn find_set(&self, set_type: &[u8], name: Option<&[u8]>) -> Option<&Set> {
        self.sets.iter().find(|set| {
            set.set_type() == set_type && set.name.as_deref().map(Vec::as_slice) == name
        })
    }

    /// Returns the frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns a mutable reference to the frames.
    pub fn frames_mut(&mut self) -> &mut Vec<Frame> {
        &mut self.frames
    }

    /// Returns the frame with the given name.
    pub fn frame(&self, name: &ObjectName) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.name() == name)
    }

    /// Returns the encrypted records.
    pub fn encrypted_records(&self) -> &[EncryptedRecord] {
        &self.encrypted_records
    }

    /// Returns the indirect records that are not frame data.
    pub fn indirect_records(&self) -> &[IndirectRecord] {
        &self.indirect_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::Template;

    #[test]
    fn test_set_accessors() {
        let logical_file = LogicalFile::new(
            vec![
                Set::new(types::FILE_HEADER, None, Template::default(), Vec::new()),
                Set::new(types::ORIGIN, None, Template::default(), Vec::new()),
                Set::new(types::CHANNEL, None, Template::default(), Vec::new()),
                Set::new(types::CHANNEL, Some("X".into()), Template::default(), Vec::new()),
            ],
            Vec::new(),
        );

        assert!(logical_file.file_header().is_some());
        assert_eq!(logical_file.origins().count(), 1);
        assert_eq!(logical_file.channels().count(), 2);
        assert!(logical_file.find_set(types::CHANNEL, Some(b"X")).is_some());
        assert!(logical_file.find_set(types::FRAME, None).is_none());
    }

    #[test]
    fn test_frame() {
        let name = ObjectName::new(1, 0, "MAIN");
        let logical_file = LogicalFile::new(Vec::new(), vec![Frame::new(name.clone(), Vec::new())]);

        assert!(logical_file.frame(&name).is_some());
        assert!(logical_file.frame(&ObjectName::new(1, 1, "MAIN")).is_none());
    }
}
