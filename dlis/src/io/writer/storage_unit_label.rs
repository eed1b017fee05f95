//! DLIS storage unit label writer.

use std::io::{self, Write};

use crate::{
    StorageUnitLabel,
    storage_unit_label::{MAX_RECORD_LENGTH, STORAGE_SET_IDENTIFIER_LENGTH, STRUCTURE},
};

/// Writes a storage unit label.
///
/// # Examples
///
/// ```
/// use dlis::{StorageUnitLabel, io::writer::storage_unit_label::write_storage_unit_label};
///
/// let label = StorageUnitLabel::default();
///
/// let mut buf = Vec::new();
/// write_storage_unit_label(&mut buf, &label)?;
///
/// assert_eq!(buf.len(), 80);
/// assert!(buf.starts_with(b"0001V1.00RECORD08192"));
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_storage_unit_label<W>(writer: &mut W, label: &StorageUnitLabel) -> io::Result<()>
where
    W: Write,
{
    if label.sequence_number() > 9999 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid sequence number: {}", label.sequence_number()),
        ));
    }

    if label.version().major() > 9 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid version: {}", label.version()),
        ));
    }

    if usize::from(label.maximum_record_length()) > MAX_RECORD_LENGTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "invalid maximum record length: {}",
                label.maximum_record_length()
            ),
        ));
    }

    let storage_set_identifier = label.storage_set_identifier();

    if storage_set_identifier.len() > STORAGE_SET_IDENTIFIER_LENGTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "storage set identifier is too long",
        ));
    }

    write!(writer, "{:04}{}", label.sequence_number(), label.version())?;
    writer.write_all(STRUCTURE)?;
    write!(writer, "{:05}", label.maximum_record_length())?;

    writer.write_all(storage_set_identifier)?;

    let padding = [b' '; STORAGE_SET_IDENTIFIER_LENGTH];
    writer.write_all(&padding[storage_set_identifier.len()..])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::reader::storage_unit_label::read_storage_unit_label, storage_unit_label::Version};

    #[test]
    fn test_write_storage_unit_label() -> io::Result<()> {
        let label = StorageUnitLabel::new(2, Version::V1_0, 16384, "WELL A");

        let mut buf = Vec::new();
        write_storage_unit_label(&mut buf, &label)?;

        let mut expected = b"0002V1.00RECORD16384WELL A".to_vec();
        expected.resize(crate::storage_unit_label::SIZE, b' ');
        assert_eq!(buf, expected);

        assert_eq!(read_storage_unit_label(&mut &buf[..])?, label);

        Ok(())
    }

    #[test]
    fn test_write_storage_unit_label_with_invalid_fields() {
        fn t(label: &StorageUnitLabel) {
            let mut buf = Vec::new();

            assert!(matches!(
                write_storage_unit_label(&mut buf, label),
                Err(e) if e.kind() == io::ErrorKind::InvalidInput
            ));
        }

        t(&StorageUnitLabel::new(10000, Version::V1_0, 8192, ""));
        t(&StorageUnitLabel::new(1, Version::new(10, 0), 8192, ""));
        t(&StorageUnitLabel::new(1, Version::V1_0, 20000, ""));
        t(&StorageUnitLabel::new(1, Version::V1_0, 8192, vec![b'x'; 61]));
    }
}
