use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use super::{Options, Writer};

/// A DLIS writer builder.
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
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::writer::Builder;
    /// let builder = Builder::default().set_visible_record_length(16384);
    /// ```
    pub fn set_visible_record_length(mut self, len: usize) -> Self {
        self.options.set_visible_record_length(len);
        self
    }

    /// Sets whether to add a checksum to each logical record segment.
    ///
    /// The default is `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::writer::Builder;
    /// let builder = Builder::default().set_checksums(true);
    /// ```
    pub fn set_checksums(mut self, value: bool) -> Self {
        self.options.checksums = value;
        self
    }

    /// Sets whether to add a trailing length to each logical record segment.
    ///
    /// The default is `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::writer::Builder;
    /// let builder = Builder::default().set_trailing_length(true);
    /// ```
    pub fn set_trailing_length(mut self, value: bool) -> Self {
        self.options.trailing_length = value;
        self
    }

    /// Builds a DLIS writer from a path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlis::io::writer::Builder;
    /// let writer = Builder::default().build_from_path("out.dlis")?;
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn build_from_path<P>(self, dst: P) -> io::Result<Writer<BufWriter<File>>>
    where
        P: AsRef<Path>,
    {
        File::create(dst).map(|file| self.build_from_writer(BufWriter::new(file)))
    }

    /// Builds a DLIS writer from a writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::io::writer::Builder;
    /// let writer = Builder::default().build_from_writer(Vec::new());
    /// ```
    pub fn build_from_writer<W>(self, writer: W) -> Writer<W>
    where
        W: Write,
    {
        Writer::with_options(writer, self.options)
    }
}
