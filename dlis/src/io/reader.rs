//! DLIS reader.

mod assembler;
mod builder;
pub mod component;
pub mod frame_data;
pub mod logical_record;
pub mod num;
mod options;
pub mod storage_unit_label;
pub mod value;
pub mod visible_record;

#[cfg(any(test, feature = "parallel"))]
use self::assembler::starts_logical_file;
pub(crate) use self::{
    assembler::Assembler,
    logical_record::{Outcome, Segmenter},
    options::Options,
};
pub use self::{
    builder::Builder,
    options::{Progress, ProgressCallback},
};

use std::io::{self, Read};

use self::{storage_unit_label::read_storage_unit_label, visible_record::read_visible_record};
use crate::{Diagnostic, LogicalFile, LogicalRecord, StorageUnitLabel};

/// A DLIS reader.
///
/// The reader reads the storage unit label, then reassembles logical records from the visible
/// records that follow it.
pub struct Reader<R> {
    inner: R,
    options: Options,
    storage_unit_label: Option<StorageUnitLabel>,
    segmenter: Segmenter,
    buf: Vec<u8>,
    is_eof: bool,
    progress: Progress,
}

impl<R> Reader<R> {
    pub(crate) fn with_options(inner: R, options: Options) -> Self {
        let segmenter = Segmenter::new(options.validate_checksums);

        Self {
            inner,
            options,
            storage_unit_label: None,
            segmenter,
            buf: Vec::new(),
            is_eof: false,
            progress: Progress::default(),
        }
    }

    /// Returns a reference to the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Reader;
    /// let reader = Reader::new(&[][..]);
    /// assert!(reader.get_ref().is_empty());
    /// ```
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns the read progress.
    pub fn progress(&self) -> Progress {
        self.progress
    }
}

impl<R> Reader<R>
where
    R: Read,
{
    /// Creates a DLIS reader with the default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::Reader;
    /// let reader = Reader::new(&[][..]);
    /// ```
    pub fn new(inner: R) -> Self {
        Builder::default().build_from_reader(inner)
    }

    /// Reads the storage unit label.
    ///
    /// The label is read once. Reading logical records reads the label first if this has not
    /// been called.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::io::reader::Builder;
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis")?;
    /// let label = reader.read_storage_unit_label()?;
    /// println!("{}", label.version());
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn read_storage_unit_label(&mut self) -> io::Result<&StorageUnitLabel> {
        let label = match self.storage_unit_label.take() {
            Some(label) => label,
            None => {
                let label = read_storage_unit_label(&mut self.inner)?;

                self.progress.bytes_read += crate::storage_unit_label::SIZE as u64;

                tracing::debug!(
                    sequence_number = label.sequence_number(),
                    version = %label.version(),
                    maximum_record_length = label.maximum_record_length(),
                    "read storage unit label"
                );

                label
            }
        };

        Ok(self.storage_unit_label.insert(label))
    }

    /// Reads a logical record.
    ///
    /// This returns the number of logical stream bytes the record's segments take, or 0 at EOF.
    /// A record that cannot be reassembled is returned as an error. Use
    /// [`Self::read_logical_files`] to skip damaged records instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::{LogicalRecord, io::reader::Builder};
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis")?;
    /// let mut record = LogicalRecord::default();
    ///
    /// while reader.read_logical_record(&mut record)? != 0 {
    ///     println!("{} {}", record.format(), record.record_type());
    /// }
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn read_logical_record(&mut self, record: &mut LogicalRecord) -> io::Result<usize> {
        match self.read_outcome()? {
            Some(Outcome::Record(r)) => {
                let len = self.segmenter.position() - r.position;
                *record = r;
                usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            Some(Outcome::Skipped(diagnostic)) => Err(into_io_error(diagnostic)),
            None => Ok(0),
        }
    }

    /// Returns an iterator over logical records.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::io::reader::Builder;
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis")?;
    ///
    /// for result in reader.logical_records() {
    ///     let record = result?;
    ///     println!("{}", record.body().len());
    /// }
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn logical_records(&mut self) -> LogicalRecords<'_, R> {
        LogicalRecords { inner: self }
    }

    /// Reads all logical files.
    ///
    /// Recoverable errors are returned as diagnostics alongside the logical files read. A
    /// physical framing error fails the whole read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::io::reader::Builder;
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis")?;
    /// let (logical_files, diagnostics) = reader.read_logical_files()?;
    ///
    /// println!("{} logical files", logical_files.len());
    ///
    /// for diagnostic in diagnostics {
    ///     eprintln!("{diagnostic}");
    /// }
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn read_logical_files(&mut self) -> io::Result<(Vec<LogicalFile>, Vec<Diagnostic>)> {
        let mut assembler = Assembler::new(self.options.load_bulk_data);

        while let Some(outcome) = self.read_outcome()? {
            assembler.push(outcome);
        }

        Ok(assembler.finish())
    }

    /// Reads all logical files, assembling each one on a separate worker.
    ///
    /// Logical records are read sequentially and split at `FILE-HEADER` sets. The logical files
    /// are then decoded in parallel. The result is the same as [`Self::read_logical_files`].
    #[cfg(feature = "parallel")]
    pub fn read_logical_files_par(&mut self) -> io::Result<(Vec<LogicalFile>, Vec<Diagnostic>)> {
        use rayon::prelude::*;

        let mut groups: Vec<Vec<Outcome>> = Vec::new();

        while let Some(outcome) = self.read_outcome()? {
            let is_start = matches!(&outcome, Outcome::Record(record) if starts_logical_file(record));

            match groups.last_mut() {
                Some(group) if !is_start => group.push(outcome),
                _ => groups.push(vec![outcome]),
            }
        }

        tracing::debug!(groups = groups.len(), "assembling logical files");

        let load_bulk_data = self.options.load_bulk_data;

        let results: Vec<_> = groups
            .into_par_iter()
            .map(|outcomes| {
                let mut assembler = Assembler::new(load_bulk_data);

                for outcome in outcomes {
                    assembler.push(outcome);
                }

                assembler.finish()
            })
            .collect();

        let mut logical_files = Vec::new();
        let mut diagnostics = Vec::new();

        for (files, file_diagnostics) in results {
            logical_files.extend(files);
            diagnostics.extend(file_diagnostics);
        }

        Ok((logical_files, diagnostics))
    }

    fn read_outcome(&mut self) -> io::Result<Option<Outcome>> {
        if self.storage_unit_label.is_none() {
            self.read_storage_unit_label()?;
        }

        loop {
            if let Some(outcome) = self.segmenter.next_outcome()? {
                self.record_progress();
                return Ok(Some(outcome));
            }

            if self.is_eof {
                let outcome = self.segmenter.finish();

                if outcome.is_some() {
                    self.record_progress();
                }

                return Ok(outcome);
            }

            self.read_visible_record()?;
        }
    }

    fn read_visible_record(&mut self) -> io::Result<()> {
        // A truncated payload is followed by EOF, which the next call sees.
        let Some(n) = read_visible_record(&mut self.inner, &mut self.buf)? else {
            self.is_eof = true;
            return Ok(());
        };

        self.progress.bytes_read += (visible_record::HEADER_SIZE + n) as u64;
        self.segmenter.push(&self.buf);

        Ok(())
    }

    fn record_progress(&mut self) {
        self.progress.logical_record_count += 1;

        if let Some(f) = self.options.progress_callback.as_ref() {
            f(self.progress);
        }
    }
}

/// An iterator over the logical records of a DLIS reader.
///
/// This is created by calling [`Reader::logical_records`].
pub struct LogicalRecords<'r, R> {
    inner: &'r mut Reader<R>,
}

impl<R> Iterator for LogicalRecords<'_, R>
where
    R: Read,
{
    type Item = io::Result<LogicalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = LogicalRecord::default();

        match self.inner.read_logical_record(&mut record) {
            Ok(0) => None,
            Ok(_) => Some(Ok(record)),
            Err(e) => Some(Err(e)),
        }
    }
}

pub(crate) fn into_io_error(diagnostic: Diagnostic) -> io::Error {
    let kind = match diagnostic {
        Diagnostic::TruncatedRecord { .. } => io::ErrorKind::UnexpectedEof,
        _ => io::ErrorKind::InvalidData,
    };

    io::Error::new(kind, diagnostic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logical_record::Format;

    fn build_storage_unit_label() -> Vec<u8> {
        let mut buf = b"   1V1.00RECORD08192".to_vec();
        buf.resize(crate::storage_unit_label::SIZE, b' ');
        buf
    }

    fn visible_record(payload: &[u8]) -> Vec<u8> {
        let len = (visible_record::HEADER_SIZE + payload.len()) as u16;
        let mut buf = len.to_be_bytes().to_vec();
        buf.extend([0xff, 0x01]);
        buf.extend(payload);
        buf
    }

    fn segment(attributes: u8, record_type: u8, body: &[u8]) -> Vec<u8> {
        let len = (4 + body.len()) as u16;
        let mut buf = len.to_be_bytes().to_vec();
        buf.extend([attributes, record_type]);
        buf.extend(body);
        buf
    }

    #[test]
    fn test_read_logical_record() -> io::Result<()> {
        let mut payload = segment(0x00, 0x01, &[0; 12]);
        payload.extend(segment(0x20, 0x00, &[0xaa; 12]));

        let mut data = build_storage_unit_label();
        data.extend(visible_record(&payload));
        data.extend(visible_record(&segment(0x40, 0x00, &[0xbb; 12])));

        let mut reader = Reader::new(&data[..]);
        let mut record = LogicalRecord::default();

        assert_eq!(reader.read_logical_record(&mut record)?, 16);
        assert_eq!(record.format(), Format::Indirect);
        assert_eq!(record.record_type(), 1);
        assert_eq!(record.position(), 0);

        assert_eq!(reader.read_logical_record(&mut record)?, 32);
        assert_eq!(record.position(), 16);
        assert_eq!(record.body().len(), 24);

        assert_eq!(reader.read_logical_record(&mut record)?, 0);

        let progress = reader.progress();
        assert_eq!(progress.bytes_read, data.len() as u64);
        assert_eq!(progress.logical_record_count, 2);

        Ok(())
    }

    #[test]
    fn test_read_logical_record_with_truncated_stream() -> io::Result<()> {
        let mut data = build_storage_unit_label();
        data.extend(visible_record(&segment(0x00, 0x01, &[0; 12])));
        data.extend(visible_record(&segment(0x20, 0x00, &[0; 12])));

        let mut reader = Reader::new(&data[..]);
        let mut record = LogicalRecord::default();

        assert_eq!(reader.read_logical_record(&mut record)?, 16);

        assert!(matches!(
            reader.read_logical_record(&mut record),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof
        ));

        assert_eq!(reader.read_logical_record(&mut record)?, 0);

        Ok(())
    }

    #[test]
    fn test_read_logical_record_with_empty_visible_record() -> io::Result<()> {
        let mut data = build_storage_unit_label();
        data.extend(visible_record(&[]));
        data.extend(visible_record(&segment(0x00, 0x01, &[0; 12])));

        let mut reader = Reader::new(&data[..]);
        let records: Vec<_> = reader.logical_records().collect::<io::Result<_>>()?;

        assert_eq!(records.len(), 1);

        Ok(())
    }

    #[test]
    fn test_read_logical_record_with_invalid_storage_unit_label() {
        let mut data = build_storage_unit_label();
        data[9..15].copy_from_slice(b"STREAM");

        let mut reader = Reader::new(&data[..]);
        let mut record = LogicalRecord::default();

        assert!(matches!(
            reader.read_logical_record(&mut record),
            Err(e) if e.kind() == io::ErrorKind::InvalidData
        ));
    }

    #[test]
    fn test_starts_logical_file() {
        let mut body = vec![0xf0, 0x0b];
        body.extend(b"FILE-HEADER");

        assert!(starts_logical_file(&LogicalRecord::new(
            Format::Explicit,
            0,
            body.clone()
        )));
        assert!(!starts_logical_file(&LogicalRecord::new(
            Format::Indirect,
            0,
            body.clone()
        )));

        let mut record = LogicalRecord::new(Format::Explicit, 0, body.clone());
        record.is_encrypted = true;
        assert!(!starts_logical_file(&record));

        // truncated template attribute label
        body.extend([0x30, 0x05, b'I']);
        assert!(!starts_logical_file(&LogicalRecord::new(
            Format::Explicit,
            0,
            body
        )));
        assert!(!starts_logical_file(&LogicalRecord::new(
            Format::Explicit,
            1,
            vec![0xf0, 0x06, b'O', b'R', b'I', b'G', b'I', b'N'],
        )));
    }
}
