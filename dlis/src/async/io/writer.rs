//! Async DLIS writer.

mod builder;

pub use self::builder::Builder;

use tokio::io::{self, AsyncWrite, AsyncWriteExt};

use crate::{
    LogicalFile, LogicalRecord, StorageUnitLabel,
    io::writer::{self as sync_writer, Options},
};

/// An async DLIS writer.
///
/// Records are encoded into an in-memory buffer, which is written to the underlying writer after
/// each call. Call [`Self::shutdown`] to write the last visible record.
pub struct Writer<W> {
    inner: W,
    encoder: sync_writer::Writer<Vec<u8>>,
}

impl<W> Writer<W>
where
    W: AsyncWrite + Unpin,
{
    /// Creates an async DLIS writer with default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::r#async::io::Writer;
    /// let writer = Writer::new(Vec::new());
    /// ```
    pub fn new(inner: W) -> Self {
        Builder::default().build_from_writer(inner)
    }

    pub(crate) fn with_options(inner: W, options: Options) -> Self {
        Self {
            inner,
            encoder: sync_writer::Writer::with_options(Vec::new(), options),
        }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwraps and returns the underlying writer.
    ///
    /// Buffered data that has not been written by [`Self::shutdown`] is discarded.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes a storage unit label.
    pub async fn write_storage_unit_label(&mut self, label: &StorageUnitLabel) -> io::Result<()> {
        self.encoder.write_storage_unit_label(label)?;
        self.write_buf().await
    }

    /// Writes a logical record.
    pub async fn write_logical_record(&mut self, record: &LogicalRecord) -> io::Result<()> {
        self.encoder.write_logical_record(record)?;
        self.write_buf().await
    }

    /// Writes a logical file.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[tokio::main]
    /// # async fn main() -> tokio::io::Result<()> {
    /// use dlis::{LogicalFile, r#async::io::Writer};
    ///
    /// let mut writer = Writer::new(Vec::new());
    ///
    /// // A logical file must start with a FILE-HEADER set.
    /// assert!(writer.write_logical_file(&LogicalFile::default()).await.is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn write_logical_file(&mut self, logical_file: &LogicalFile) -> io::Result<()> {
        self.encoder.write_logical_file(logical_file)?;
        self.write_buf().await
    }

    /// Writes the last visible record and shuts down the underlying writer.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.encoder.try_finish()?;
        self.write_buf().await?;
        self.inner.shutdown().await
    }

    async fn write_buf(&mut self) -> io::Result<()> {
        let buf = self.encoder.get_mut();

        if !buf.is_empty() {
            self.inner.write_all(buf).await?;
            buf.clear();
        }

        Ok(())
    }
}
