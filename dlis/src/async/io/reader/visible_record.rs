use tokio::io::{self, AsyncRead, AsyncReadExt};

use crate::io::reader::visible_record::{HEADER_SIZE, parse_header};

/// Reads a visible record header and returns the payload length.
///
/// This returns `None` at EOF. A header cut short by EOF is also treated as EOF.
pub(crate) async fn read_header<R>(reader: &mut R) -> io::Result<Option<usize>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0; HEADER_SIZE];
    let mut n = 0;

    while n < buf.len() {
        match reader.read(&mut buf[n..]).await? {
            0 => break,
            m => n += m,
        }
    }

    match n {
        0 => Ok(None),
        HEADER_SIZE => parse_header(buf).map(Some),
        _ => {
            tracing::warn!(len = n, "truncated visible record header");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_header() -> io::Result<()> {
        let mut src = &[0x00, 0x06, 0xff, 0x01][..];
        assert_eq!(read_header(&mut src).await?, Some(2));

        let mut src = &[][..];
        assert_eq!(read_header(&mut src).await?, None);

        let mut src = &[0x00, 0x06][..];
        assert_eq!(read_header(&mut src).await?, None);

        let mut src = &[0x00, 0x06, 0xff, 0x02][..];
        assert!(matches!(
            read_header(&mut src).await,
            Err(e) if e.kind() == io::ErrorKind::InvalidData
        ));

        Ok(())
    }
}
