//! DLIS storage unit label reader.

use std::io::{self, Read};

use bstr::{BString, ByteSlice};

use super::visible_record::FramingError;
use crate::{
    StorageUnitLabel,
    storage_unit_label::{SIZE, STRUCTURE},
};

/// Reads a storage unit label.
///
/// # Examples
///
/// ```
/// use dlis::io::reader::storage_unit_label::read_storage_unit_label;
///
/// let mut data = Vec::new();
/// data.extend(b"   1V1.00RECORD08192");
/// data.extend(format!("{:<60}", "Default Storage Set").into_bytes());
///
/// let label = read_storage_unit_label(&mut &data[..])?;
/// assert_eq!(label.sequence_number(), 1);
/// assert_eq!(label.maximum_record_length(), 8192);
/// assert_eq!(label.storage_set_identifier(), "Default Storage Set");
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn read_storage_unit_label<R>(reader: &mut R) -> io::Result<StorageUnitLabel>
where
    R: Read,
{
    let mut buf = [0; SIZE];
    reader.read_exact(&mut buf)?;
    parse_storage_unit_label(&buf).map_err(io::Error::from)
}

pub(crate) fn parse_storage_unit_label(buf: &[u8; SIZE]) -> Result<StorageUnitLabel, FramingError> {
    let (sequence_number, rest) = buf.split_at(4);
    let (version, rest) = rest.split_at(5);
    let (structure, rest) = rest.split_at(6);
    let (maximum_record_length, storage_set_identifier) = rest.split_at(5);

    let sequence_number = parse_number(sequence_number)
        .ok_or(FramingError::InvalidStorageUnitLabel("sequence number"))?;

    let version = version
        .to_str()
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(FramingError::InvalidStorageUnitLabel("version"))?;

    if structure != STRUCTURE {
        return Err(FramingError::InvalidStorageUnitLabel("storage unit structure"));
    }

    let maximum_record_length = parse_number(maximum_record_length)
        .ok_or(FramingError::InvalidStorageUnitLabel("maximum record length"))?;

    let storage_set_identifier = BString::from(storage_set_identifier.trim_end_with(|c| c == ' '));

    Ok(StorageUnitLabel {
        sequence_number,
        version,
        maximum_record_length,
        storage_set_identifier,
    })
}

fn parse_number(buf: &[u8]) -> Option<u16> {
    buf.trim_ascii().to_str().ok()?.parse().ok()
}
