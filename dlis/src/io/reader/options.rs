use std::{fmt, sync::Arc};

/// Read progress, reported after each logical record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Progress {
    /// The number of physical bytes read, including the storage unit label and visible record
    /// headers.
    pub bytes_read: u64,
    /// The number of logical records read, including skipped records.
    pub logical_record_count: u64,
}

/// A progress callback.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Options {
    pub load_bulk_data: bool,
    pub validate_checksums: bool,
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            load_bulk_data: true,
            validate_checksums: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("load_bulk_data", &self.load_bulk_data)
            .field("validate_checksums", &self.validate_checksums)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}
