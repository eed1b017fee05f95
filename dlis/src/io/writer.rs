//! DLIS writer.

mod builder;
pub mod component;
pub mod frame_data;
mod logical_record;
pub mod num;
mod options;
pub mod storage_unit_label;
pub mod value;
pub mod visible_record;

pub use self::builder::Builder;
pub(crate) use self::options::Options;

use std::{
    collections::HashSet,
    error, fmt,
    io::{self, Write},
};

use bstr::BString;

use self::{
    component::write_set,
    frame_data::write_frame_data,
    logical_record::{Trailer, write_logical_record},
    storage_unit_label::write_storage_unit_label,
    visible_record::VisibleRecord,
};
use crate::{
    Frame, LogicalFile, LogicalRecord, RepresentationCode, Set, StorageUnitLabel,
    frame::channel_names,
    logical_record::{ExplicitType, Format, IndirectType},
    set::types,
    storage_unit_label::Version,
    value::ObjectName,
};

/// An error returned when an object cannot be serialized unambiguously.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InconsistentObjectError {
    /// An object does not have one attribute slot per template attribute definition.
    AttributeCount {
        /// The object name.
        object: ObjectName,
        /// The number of template attribute definitions.
        expected: usize,
        /// The number of attribute slots.
        actual: usize,
    },
    /// An object overrides an invariant attribute.
    InvariantAttribute {
        /// The object name.
        object: ObjectName,
        /// The attribute label.
        label: BString,
    },
    /// A template default value does not have the declared count.
    DefaultCount {
        /// The attribute label.
        label: BString,
        /// The declared count.
        expected: u32,
        /// The number of default values.
        actual: usize,
    },
    /// A value does not have the representation code of its attribute or curve.
    ValueRepresentationCode {
        /// The declared representation code.
        expected: RepresentationCode,
        /// The representation code of the value.
        actual: RepresentationCode,
    },
    /// A frame row is missing a sample.
    MissingSample {
        /// The frame name.
        frame: ObjectName,
        /// The curve name.
        curve: ObjectName,
        /// The row index.
        row: usize,
    },
    /// The curves of a frame do not have the same number of rows.
    RowCount {
        /// The frame name.
        frame: ObjectName,
    },
}

impl error::Error for InconsistentObjectError {}

impl fmt::Display for InconsistentObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeCount {
                object,
                expected,
                actual,
            } => write!(
                f,
                "object {object}: expected {expected} attributes, got {actual}"
            ),
            Self::InvariantAttribute { object, label } => {
                write!(f, "object {object}: invariant attribute {label} is overridden")
            }
            Self::DefaultCount {
                label,
                expected,
                actual,
            } => write!(
                f,
                "attribute {label}: expected {expected} default values, got {actual}"
            ),
            Self::ValueRepresentationCode { expected, actual } => write!(
                f,
                "expected value with representation code {expected:?}, got {actual:?}"
            ),
            Self::MissingSample { frame, curve, row } => {
                write!(f, "frame {frame}: missing {curve} sample in row {row}")
            }
            Self::RowCount { frame } => write!(f, "frame {frame}: curve row counts differ"),
        }
    }
}

impl From<InconsistentObjectError> for io::Error {
    fn from(e: InconsistentObjectError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, e)
    }
}

/// An error returned when the sets of a logical file are not in a writable order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderingError {
    /// The first set is not a `FILE-HEADER` set.
    MissingFileHeader,
    /// There is no `ORIGIN` set before the first `CHANNEL` or `FRAME` set.
    MissingOrigin,
    /// A `FRAME` object lists a channel that no earlier `CHANNEL` set declares.
    UndeclaredChannel {
        /// The frame name.
        frame: ObjectName,
        /// The channel name.
        channel: ObjectName,
    },
    /// A frame has no object in a `FRAME` set.
    UndeclaredFrame(ObjectName),
}

impl error::Error for OrderingError {}

impl fmt::Display for OrderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFileHeader => f.write_str("first set is not a FILE-HEADER set"),
            Self::MissingOrigin => f.write_str("missing ORIGIN set"),
            Self::UndeclaredChannel { frame, channel } => {
                write!(f, "frame {frame}: undeclared channel {channel}")
            }
            Self::UndeclaredFrame(name) => write!(f, "undeclared frame {name}"),
        }
    }
}

impl From<OrderingError> for io::Error {
    fn from(e: OrderingError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, e)
    }
}

/// A DLIS writer.
///
/// Logical records are split into segments and packed into visible records. A visible record is
/// written once it is full, so the last one is only written by [`Self::try_finish`] (or when the
/// writer is dropped).
///
/// # Examples
///
/// ```
/// use dlis::{LogicalRecord, StorageUnitLabel, io::Writer, logical_record::Format};
///
/// let mut writer = Writer::new(Vec::new());
/// writer.write_storage_unit_label(&StorageUnitLabel::default())?;
///
/// let record = LogicalRecord::new(Format::Indirect, 1, b"payload".to_vec());
/// writer.write_logical_record(&record)?;
/// writer.try_finish()?;
///
/// assert_eq!(writer.get_ref().len(), 80 + 4 + 16);
/// # Ok::<_, std::io::Error>(())
/// ```
pub struct Writer<W>
where
    W: Write,
{
    inner: W,
    options: Options,
    visible_record: VisibleRecord,
    has_storage_unit_label: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a DLIS writer with default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Writer;
    /// let writer = Writer::new(Vec::new());
    /// ```
    pub fn new(inner: W) -> Self {
        Builder::default().build_from_writer(inner)
    }

    pub(crate) fn with_options(inner: W, options: Options) -> Self {
        let visible_record = VisibleRecord::new(options.visible_record_length);

        Self {
            inner,
            options,
            visible_record,
            has_storage_unit_label: false,
        }
    }

    /// Returns a reference to the underlying writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Writer;
    /// let writer = Writer::new(Vec::new());
    /// assert!(writer.get_ref().is_empty());
    /// ```
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the underlying writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Writer;
    /// let mut writer = Writer::new(Vec::new());
    /// assert!(writer.get_mut().is_empty());
    /// ```
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Writes a storage unit label.
    ///
    /// This must be called before any logical record is written. If it is not, a default label
    /// is written with the first logical record.
    ///
    /// The label maximum record length, if declared, must be at least the visible record length
    /// of the writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{StorageUnitLabel, io::Writer};
    ///
    /// let mut writer = Writer::new(Vec::new());
    /// writer.write_storage_unit_label(&StorageUnitLabel::default())?;
    ///
    /// assert_eq!(writer.get_ref().len(), 80);
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn write_storage_unit_label(&mut self, label: &StorageUnitLabel) -> io::Result<()> {
        if self.has_storage_unit_label {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "storage unit label already written",
            ));
        }

        let maximum_record_length = usize::from(label.maximum_record_length());

        if maximum_record_length != 0 && maximum_record_length < self.options.visible_record_length
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "maximum record length ({maximum_record_length}) is less than the visible record length ({})",
                    self.options.visible_record_length
                ),
            ));
        }

        write_storage_unit_label(&mut self.inner, label)?;
        self.has_storage_unit_label = true;

        Ok(())
    }

    /// Writes a logical record.
    ///
    /// The record is written as is: its body is not validated.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{LogicalRecord, io::Writer, logical_record::Format};
    ///
    /// let mut writer = Writer::new(Vec::new());
    ///
    /// let record = LogicalRecord::new(Format::Indirect, 127, Vec::new());
    /// writer.write_logical_record(&record)?;
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn write_logical_record(&mut self, record: &LogicalRecord) -> io::Result<()> {
        self.write_record(
            record.format(),
            record.is_encrypted(),
            record.record_type(),
            record.body(),
        )
    }

    /// Writes a logical file.
    ///
    /// The sets are written in order, followed by the encrypted records, the indirect records,
    /// and one frame data record per frame row.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderingError`] if the first set is not a `FILE-HEADER` set, if an `ORIGIN`
    /// set does not precede the `CHANNEL` and `FRAME` sets, or if a frame or channel is used
    /// before it is declared. Returns an [`InconsistentObjectError`] if a set or frame cannot be
    /// serialized. Both are returned before any record of the logical file is written.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{
    ///     LogicalFile, RepresentationCode, Set, StorageUnitLabel, Value,
    ///     io::Writer,
    ///     set::{Attribute, AttributeDefinition, Object, Template},
    ///     value::ObjectName,
    /// };
    ///
    /// let template = Template::new(vec![AttributeDefinition::new("ID", RepresentationCode::Ascii)]);
    /// let object = Object::new(
    ///     ObjectName::new(0, 0, "0"),
    ///     vec![Some(Attribute::new(RepresentationCode::Ascii, "", vec![Value::Ascii("WELL A".into())]))],
    /// );
    /// let file_header = Set::new("FILE-HEADER", None, template.clone(), vec![object.clone()]);
    /// let origin = Set::new("ORIGIN", None, template, vec![object]);
    ///
    /// let logical_file = LogicalFile::new(vec![file_header, origin], Vec::new());
    ///
    /// let mut writer = Writer::new(Vec::new());
    /// writer.write_storage_unit_label(&StorageUnitLabel::default())?;
    /// writer.write_logical_file(&logical_file)?;
    /// writer.try_finish()?;
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn write_logical_file(&mut self, logical_file: &LogicalFile) -> io::Result<()> {
        validate_ordering(logical_file)?;

        for frame in logical_file.frames() {
            validate_row_counts(frame)?;
        }

        // Every record body is encoded before anything is written, so an inconsistent object
        // leaves the output untouched.
        let set_records = logical_file
            .sets()
            .iter()
            .map(encode_set_record)
            .collect::<io::Result<Vec<_>>>()?;

        let mut frame_data_records = Vec::new();

        for frame in logical_file.frames() {
            encode_frame_data_records(&mut frame_data_records, frame)?;
        }

        for (record_type, body) in &set_records {
            self.write_record(Format::Explicit, false, *record_type, body)?;
        }

        for record in logical_file.encrypted_records() {
            let format = if record.is_explicit() {
                Format::Explicit
            } else {
                Format::Indirect
            };

            self.write_record(format, true, record.record_type(), record.body())?;
        }

        for record in logical_file.indirect_records() {
            self.write_record(Format::Indirect, false, record.record_type(), record.body())?;
        }

        let record_type = u8::from(IndirectType::FrameData);

        for body in &frame_data_records {
            self.write_record(Format::Indirect, false, record_type, body)?;
        }

        Ok(())
    }

    /// Writes the pending visible record and flushes the underlying writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Writer;
    /// let mut writer = Writer::new(Vec::new());
    /// writer.try_finish()?;
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn try_finish(&mut self) -> io::Result<()> {
        self.visible_record.flush(&mut self.inner)?;
        self.inner.flush()
    }

    fn trailer(&self) -> Trailer {
        Trailer {
            checksum: self.options.checksums,
            trailing_length: self.options.trailing_length,
        }
    }

    fn write_default_storage_unit_label(&mut self) -> io::Result<()> {
        if self.has_storage_unit_label {
            return Ok(());
        }

        let maximum_record_length = u16::try_from(self.options.visible_record_length)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let label = StorageUnitLabel::new(1, Version::V1_0, maximum_record_length, "");
        self.write_storage_unit_label(&label)
    }

    fn write_record(
        &mut self,
        format: Format,
        is_encrypted: bool,
        record_type: u8,
        body: &[u8],
    ) -> io::Result<()> {
        self.write_default_storage_unit_label()?;

        let trailer = self.trailer();

        write_logical_record(
            &mut self.inner,
            &mut self.visible_record,
            trailer,
            format,
            is_encrypted,
            record_type,
            body,
        )
    }
}

impl<W> Drop for Writer<W>
where
    W: Write,
{
    fn drop(&mut self) {
        let _ = self.try_finish();
    }
}

fn encode_set_record(set: &Set) -> io::Result<(u8, Vec<u8>)> {
    let mut buf = Vec::new();
    write_set(&mut buf, set)?;

    let record_type = u8::from(ExplicitType::for_set_type(set.set_type()));

    Ok((record_type, buf))
}

fn encode_frame_data_records(records: &mut Vec<Vec<u8>>, frame: &Frame) -> io::Result<()> {
    let row_count = frame.row_count();
    let frame_numbers = frame.frame_numbers();
    let has_frame_numbers = frame_numbers.len() == row_count;

    for row in 0..row_count {
        let frame_number = if has_frame_numbers {
            frame_numbers[row]
        } else {
            u32::try_from(row + 1).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        };

        let mut buf = Vec::new();
        write_frame_data(&mut buf, frame, row, frame_number)?;
        records.push(buf);
    }

    tracing::debug!(frame = %frame.name(), row_count, "encoded frame data");

    Ok(())
}

fn validate_ordering(logical_file: &LogicalFile) -> Result<(), OrderingError> {
    let mut sets = logical_file.sets().iter();

    if !sets.next().is_some_and(|set| set.is_file_header()) {
        return Err(OrderingError::MissingFileHeader);
    }

    let mut has_origin = false;
    let mut channels = HashSet::new();
    let mut frames = HashSet::new();

    for set in sets {
        let set_type: &[u8] = set.set_type();

        if set_type == types::ORIGIN {
            has_origin = true;
        } else if set_type == types::CHANNEL {
            if !has_origin {
                return Err(OrderingError::MissingOrigin);
            }

            channels.extend(set.objects().iter().map(|object| object.name()));
        } else if set_type == types::FRAME {
            if !has_origin {
                return Err(OrderingError::MissingOrigin);
            }

            for object in set.objects() {
                if let Some(channel) = channel_names(set, object)
                    .into_iter()
                    .find(|name| !channels.contains(name))
                {
                    return Err(OrderingError::UndeclaredChannel {
                        frame: object.name().clone(),
                        channel: channel.clone(),
                    });
                }

                frames.insert(object.name());
            }
        }
    }

    if !has_origin {
        return Err(OrderingError::MissingOrigin);
    }

    if let Some(frame) = logical_file
        .frames()
        .iter()
        .find(|frame| !frames.contains(frame.name()))
    {
        return Err(OrderingError::UndeclaredFrame(frame.name().clone()));
    }

    Ok(())
}

fn validate_row_counts(frame: &Frame) -> Result<(), InconsistentObjectError> {
    let row_count = frame.row_count();

    let is_consistent = frame
        .curves()
        .iter()
        .all(|curve| row_count.checked_mul(curve.element_count()) == Some(curve.samples().len()));

    if is_consistent {
        Ok(())
    } else {
        Err(InconsistentObjectError::RowCount {
            frame: frame.name().clone(),
        })
    }
}
