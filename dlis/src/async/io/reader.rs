//! Async DLIS reader.

mod builder;
pub mod storage_unit_label;
mod visible_record;

pub use self::builder::Builder;

use futures::{Stream, stream};
use tokio::io::{self, AsyncRead, AsyncReadExt};

use self::{storage_unit_label::read_storage_unit_label, visible_record::read_header};
use crate::{
    Diagnostic, LogicalFile, LogicalRecord, StorageUnitLabel,
    io::reader::{Assembler, Options, Outcome, Progress, Segmenter, into_io_error, visible_record::HEADER_SIZE},
};

/// An async DLIS reader.
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
    R: AsyncRead + Unpin,
{
    /// Creates an async DLIS reader with the default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::r#async::io::Reader;
    /// let reader = Reader::new(&[][..]);
    /// ```
    pub fn new(inner: R) -> Self {
        Builder::default().build_from_reader(inner)
    }

    /// Reads the storage unit label.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> tokio::io::Result<()> {
    /// use dlis::r#async::io::reader::Builder;
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis").await?;
    /// let label = reader.read_storage_unit_label().await?;
    /// println!("{}", label.version());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_storage_unit_label(&mut self) -> io::Result<&StorageUnitLabel> {
        let label = match self.storage_unit_label.take() {
            Some(label) => label,
            None => {
                let label = read_storage_unit_label(&mut self.inner).await?;
                self.progress.bytes_read += crate::storage_unit_label::SIZE as u64;
                label
            }
        };

        Ok(self.storage_unit_label.insert(label))
    }

    /// Reads a logical record.
    ///
    /// This returns the number of logical stream bytes the record's segments take, or 0 at EOF.
    pub async fn read_logical_record(&mut self, record: &mut LogicalRecord) -> io::Result<usize> {
        match self.read_outcome().await? {
            Some(Outcome::Record(r)) => {
                let len = self.segmenter.position() - r.position;
                *record = r;
                usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            Some(Outcome::Skipped(diagnostic)) => Err(into_io_error(diagnostic)),
            None => Ok(0),
        }
    }

    /// Returns a stream over logical records.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> tokio::io::Result<()> {
    /// use futures::TryStreamExt;
    /// use dlis::r#async::io::reader::Builder;
    ///
    /// let mut reader = Builder::default().build_from_path("sample.dlis").await?;
    /// let mut records = reader.logical_records();
    ///
    /// while let Some(record) = records.try_next().await? {
    ///     println!("{}", record.body().len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn logical_records(&mut self) -> impl Stream<Item = io::Result<LogicalRecord>> + '_ {
        Box::pin(stream::try_unfold(self, |reader| async move {
            let mut record = LogicalRecord::default();

            match reader.read_logical_record(&mut record).await? {
                0 => Ok(None),
                _ => Ok(Some((record, reader))),
            }
        }))
    }

    /// Reads all logical files.
    ///
    /// Recoverable errors are returned as diagnostics alongside the logical files read.
    pub async fn read_logical_files(&mut self) -> io::Result<(Vec<LogicalFile>, Vec<Diagnostic>)> {
        let mut assembler = Assembler::new(self.options.load_bulk_data);

        while let Some(outcome) = self.read_outcome().await? {
            assembler.push(outcome);
        }

        Ok(assembler.finish())
    }

    async fn read_outcome(&mut self) -> io::Result<Option<Outcome>> {
        if self.storage_unit_label.is_none() {
            self.read_storage_unit_label().await?;
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

            self.read_visible_record().await?;
        }
    }

    async fn read_visible_record(&mut self) -> io::Result<()> {
        let Some(len) = read_header(&mut self.inner).await? else {
            self.is_eof = true;
            return Ok(());
        };

        self.buf.clear();
        let n = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut self.buf)
            .await?;

        self.progress.bytes_read += (HEADER_SIZE + n) as u64;
        self.segmenter.push(&self.buf);

        if n < len {
            tracing::warn!(expected = len, actual = n, "truncated visible record");
            self.is_eof = true;
        }

        Ok(())
    }

    fn record_progress(&mut self) {
        self.progress.logical_record_count += 1;

        if let Some(f) = self.options.progress_callback.as_ref() {
            f(self.progress);
        }
    }
}
