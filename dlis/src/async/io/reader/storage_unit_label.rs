use tokio::io::{self, AsyncRead, AsyncReadExt};

use crate::{
    StorageUnitLabel, io::reader::storage_unit_label::parse_storage_unit_label,
    storage_unit_label::SIZE,
};

/// Reads a storage unit label.
pub async fn read_storage_unit_label<R>(reader: &mut R) -> io::Result<StorageUnitLabel>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0; SIZE];
    reader.read_exact(&mut buf).await?;
    parse_storage_unit_label(&buf).map_err(io::Error::from)
}
