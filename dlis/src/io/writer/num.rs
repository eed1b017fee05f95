//! DLIS numeric field encoders.

use std::io::{self, Write};

/// The largest value a `UVARI` can hold.
pub const MAX_UVARI: u32 = (1 << 30) - 1;

pub(crate) fn write_u8<W>(writer: &mut W, n: u8) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&[n])
}

pub(crate) fn write_i8<W>(writer: &mut W, n: i8) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_u16_be<W>(writer: &mut W, n: u16) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_i16_be<W>(writer: &mut W, n: i16) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_u32_be<W>(writer: &mut W, n: u32) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_i32_be<W>(writer: &mut W, n: i32) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_f32_be<W>(writer: &mut W, n: f32) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

pub(crate) fn write_f64_be<W>(writer: &mut W, n: f64) -> io::Result<()>
where
    W: Write,
{
    writer.write_all(&n.to_be_bytes())
}

/// Writes a variable-length unsigned integer (`UVARI`).
///
/// The shortest form that holds the value is used.
///
/// # Errors
///
/// Returns an error if `n` is larger than [`MAX_UVARI`].
///
/// # Examples
///
/// ```
/// use dlis::io::writer::num::write_uvari;
///
/// let mut buf = Vec::new();
/// write_uvari(&mut buf, 256)?;
/// assert_eq!(buf, [0x81, 0x00]);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_uvari<W>(writer: &mut W, n: u32) -> io::Result<()>
where
    W: Write,
{
    if n < 0x80 {
        write_u8(writer, n as u8)
    } else if n < 0x4000 {
        write_u16_be(writer, 0x8000 | n as u16)
    } else if n <= MAX_UVARI {
        write_u32_be(writer, 0xc000_0000 | n)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("UVARI value out of range: {n}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_uvari() -> io::Result<()> {
        fn t(buf: &mut Vec<u8>, n: u32, expected: &[u8]) -> io::Result<()> {
            buf.clear();
            write_uvari(buf, n)?;
            assert_eq!(buf, expected);
            Ok(())
        }

        let mut buf = Vec::new();

        t(&mut buf, 0, &[0x00])?;
        t(&mut buf, 127, &[0x7f])?;
        t(&mut buf, 128, &[0x80, 0x80])?;
        t(&mut buf, 16383, &[0xbf, 0xff])?;
        t(&mut buf, 16384, &[0xc0, 0x00, 0x40, 0x00])?;
        t(&mut buf, MAX_UVARI, &[0xff, 0xff, 0xff, 0xff])?;

        buf.clear();
        assert!(matches!(
            write_uvari(&mut buf, MAX_UVARI + 1),
            Err(e) if e.kind() == io::ErrorKind::InvalidInput
        ));

        Ok(())
    }
}
