use std::{path::Path, sync::Arc};

use tokio::{
    fs::File,
    io::{self, AsyncRead, BufReader},
};

use super::Reader;
use crate::io::reader::{Options, Progress};

/// An async DLIS reader builder.
#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
}

impl Builder {
    /// Sets whether to load frame data.
    ///
    /// The default is `true`.
    pub fn load_bulk_data(mut self, value: bool) -> Self {
        self.options.load_bulk_data = value;
        self
    }

    /// Sets whether to validate segment checksums.
    ///
    /// The default is `true`.
    pub fn validate_checksums(mut self, value: bool) -> Self {
        self.options.validate_checksums = value;
        self
    }

    /// Sets a callback that is called after each logical record.
    pub fn set_progress_callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.options.progress_callback = Some(Arc::new(f));
        self
    }

    /// Builds an async DLIS reader from a path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> tokio::io::Result<()> {
    /// use dlis::r#async::io::reader::Builder;
    /// let reader = Builder::default().build_from_path("sample.dlis").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build_from_path<P>(self, src: P) -> io::Result<Reader<BufReader<File>>>
    where
        P: AsRef<Path>,
    {
        File::open(src)
            .await
            .map(|file| self.build_from_reader(BufReader::new(file)))
    }

    /// Builds an async DLIS reader from a reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::r#async::io::reader::Builder;
    /// let reader = Builder::default().build_from_reader(&[][..]);
    /// ```
    pub fn build_from_reader<R>(self, reader: R) -> Reader<R>
    where
        R: AsyncRead + Unpin,
    {
        Reader::with_options(reader, self.options)
    }
}
