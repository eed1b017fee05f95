use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
    sync::Arc,
};

use super::{Options, Progress, Reader};

/// A DLIS reader builder.
#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
}

impl Builder {
    /// Sets whether to load frame data.
    ///
    /// If `false`, frame data records are skipped and curves are returned without samples.
    /// Frame data can be decoded later with [`super::frame_data::read_frame_data`].
    ///
    /// The default is `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::reader::Builder;
    /// let builder = Builder::default().load_bulk_data(false);
    /// ```
    pub fn load_bulk_data(mut self, value: bool) -> Self {
        self.options.load_bulk_data = value;
        self
    }

    /// Sets whether to validate segment checksums.
    ///
    /// If `false`, checksums are skipped and records are marked unchecked.
    ///
    /// The default is `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::reader::Builder;
    /// let builder = Builder::default().validate_checksums(false);
    /// ```
    pub fn validate_checksums(mut self, value: bool) -> Self {
        self.options.validate_checksums = value;
        self
    }

    /// Sets a callback that is called after each logical record.
    ///
    /// The default is no callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::reader::Builder;
    ///
    /// let builder = Builder::default().set_progress_callback(|progress| {
    ///     eprintln!("{} bytes read", progress.bytes_read);
    /// });
    /// ```
    pub fn set_progress_callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.options.progress_callback = Some(Arc::new(f));
        self
    }

    /// Builds a DLIS reader from a path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::io::reader::Builder;
    /// let reader = Builder::default().build_from_path("sample.dlis")?;
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn build_from_path<P>(self, src: P) -> io::Result<Reader<BufReader<File>>>
    where
        P: AsRef<Path>,
    {
        File::open(src).map(|file| self.build_from_reader(BufReader::new(file)))
    }

    /// Builds a DLIS reader from a reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::reader::Builder;
    /// let reader = Builder::default().build_from_reader(&[][..]);
    /// ```
    pub fn build_from_reader<R>(self, reader: R) -> Reader<R>
    where
        R: Read,
    {
        Reader::with_options(reader, self.options)
    }
}
