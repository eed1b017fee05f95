use std::path::Path;

use tokio::{
    fs::File,
    io::{self, AsyncWrite},
};

use super::Writer;
use crate::io::writer::Options;

/// An async DLIS writer builder.
#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
}

impl Builder {
    /// Sets the maximum visible record length.
    ///
    /// The length is clamped to 20..=16384 and rounded down to an even number.
    ///
    /// The default is 8192.
    pub fn set_visible_record_length(mut self, len: usize) -> Self {
        self.options.set_visible_record_length(len);
        self
    }

    /// Sets whether to add a checksum to each logical record segment.
    ///
    /// The default is `false`.
    pub fn set_checksums(mut self, value: bool) -> Self {
        self.options.checksums = value;
        self
    }

    /// Sets whether to add a trailing length to each logical record segment.
    ///
    /// The default is `false`.
    pub fn set_trailing_length(mut self, value: bool) -> Self {
        self.options.trailing_length = value;
        self
    }

    /// Builds an async DLIS writer from a path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> tokio::io::Result<()> {
    /// use dlis::r#async::io::writer::Builder;
    /// let writer = Builder::default().build_from_path("out.dlis").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build_from_path<P>(self, dst: P) -> io::Result<Writer<File>>
    where
        P: AsRef<Path>,
    {
        File::create(dst)
            .await
            .map(|file| self.build_from_writer(file))
    }

    /// Builds an async DLIS writer from a writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::r#async::io::writer::Builder;
    /// use tokio::io;
    /// let writer = Builder::default().build_from_writer(io::sink());
    /// ```
    pub fn build_from_writer<W>(self, writer: W) -> Writer<W>
    where
        W: AsyncWrite + Unpin,
    {
        Writer::with_options(writer, self.options)
    }
}
