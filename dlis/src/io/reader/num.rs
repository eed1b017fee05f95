//! DLIS numeric field decoders.

use std::io;

pub(crate) fn read_array<const N: usize>(src: &mut &[u8]) -> io::Result<[u8; N]> {
    let (buf, rest) = src
        .split_first_chunk()
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;

    *src = rest;

    Ok(*buf)
}

pub(crate) fn read_bytes<'a>(src: &mut &'a [u8], len: usize) -> io::Result<&'a [u8]> {
    if src.len() < len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
    }

    let (buf, rest) = src.split_at(len);
    *src = rest;

    Ok(buf)
}

pub(crate) fn read_u8(src: &mut &[u8]) -> io::Result<u8> {
    read_array(src).map(u8::from_be_bytes)
}

pub(crate) fn read_i8(src: &mut &[u8]) -> io::Result<i8> {
    read_array(src).map(i8::from_be_bytes)
}

pub(crate) fn read_u16_be(src: &mut &[u8]) -> io::Result<u16> {
    read_array(src).map(u16::from_be_bytes)
}

pub(crate) fn read_i16_be(src: &mut &[u8]) -> io::Result<i16> {
    read_array(src).map(i16::from_be_bytes)
}

pub(crate) fn read_u32_be(src: &mut &[u8]) -> io::Result<u32> {
    read_array(src).map(u32::from_be_bytes)
}

pub(crate) fn read_i32_be(src: &mut &[u8]) -> io::Result<i32> {
    read_array(src).map(i32::from_be_bytes)
}

pub(crate) fn read_f32_be(src: &mut &[u8]) -> io::Result<f32> {
    read_array(src).map(f32::from_be_bytes)
}

pub(crate) fn read_f64_be(src: &mut &[u8]) -> io::Result<f64> {
    read_array(src).map(f64::from_be_bytes)
}

/// Reads a variable-length unsigned integer (`UVARI`).
///
/// The two high bits of the first byte select the width: `0x` is 1 byte (7 bits), `10` is 2
/// bytes (14 bits), and `11` is 4 bytes (30 bits).
///
/// # Examples
///
/// ```
/// use dlis::io::reader::num::read_uvari;
///
/// let mut src = &[0x81, 0x00][..];
/// assert_eq!(read_uvari(&mut src)?, 256);
/// assert!(src.is_empty());
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn read_uvari(src: &mut &[u8]) -> io::Result<u32> {
    let b0 = read_u8(src)?;

    if b0 & 0x80 == 0 {
        Ok(u32::from(b0))
    } else if b0 & 0x40 == 0 {
        let b1 = read_u8(src)?;
        Ok(u32::from(u16::from_be_bytes([b0 & 0x3f, b1])))
    } else {
        let [b1, b2, b3] = read_array(src)?;
        Ok(u32::from_be_bytes([b0 & 0x3f, b1, b2, b3]))
    }
}
