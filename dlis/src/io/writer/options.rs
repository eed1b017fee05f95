use crate::{io::reader::visible_record, logical_record::segment, storage_unit_label};

const DEFAULT_VISIBLE_RECORD_LENGTH: usize = 8192;
const MIN_VISIBLE_RECORD_LENGTH: usize = visible_record::HEADER_SIZE + segment::MIN_LENGTH;
const MAX_VISIBLE_RECORD_LENGTH: usize = storage_unit_label::MAX_RECORD_LENGTH;

#[derive(Clone, Debug)]
pub(crate) struct Options {
    pub visible_record_length: usize,
    pub checksums: bool,
    pub trailing_length: bool,
}

impl Options {
    /// Sets the visible record length, clamped to the RP66 V1 bounds and rounded down to an even
    /// number.
    pub fn set_visible_record_length(&mut self, len: usize) {
        self.visible_record_length =
            len.clamp(MIN_VISIBLE_RECORD_LENGTH, MAX_VISIBLE_RECORD_LENGTH) & !1;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            visible_record_length: DEFAULT_VISIBLE_RECORD_LENGTH,
            checksums: false,
            trailing_length: false,
        }
    }
}
