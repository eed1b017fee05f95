//! DLIS value decoder.

use std::io;

use bstr::BString;

use super::num::{
    read_array, read_bytes, read_f32_be, read_f64_be, read_i8, read_i16_be, read_i32_be,
    read_u8, read_u16_be, read_u32_be, read_uvari,
};
use crate::{
    RepresentationCode, Value,
    value::{AttributeReference, DateTime, ObjectName, ObjectReference, TimeZone},
};

/// Reads a value with the given representation code.
///
/// # Examples
///
/// ```
/// use dlis::{RepresentationCode, Value, io::reader::value::read_value};
///
/// let mut src = &[0x02, b'G', b'R'][..];
/// let value = read_value(&mut src, RepresentationCode::Ident)?;
/// assert_eq!(value, Value::Ident("GR".into()));
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn read_value(src: &mut &[u8], code: RepresentationCode) -> io::Result<Value> {
    match code {
        RepresentationCode::Fshort => read_u16_be(src).map(decode_fshort).map(Value::Fshort),
        RepresentationCode::Fsingl => read_f32_be(src).map(Value::Fsingl),
        RepresentationCode::Fsing1 => {
            let value = read_f32_be(src)?;
            let bound = read_f32_be(src)?;
            Ok(Value::Fsing1(value, bound))
        }
        RepresentationCode::Fsing2 => {
            let value = read_f32_be(src)?;
            let a = read_f32_be(src)?;
            let b = read_f32_be(src)?;
            Ok(Value::Fsing2(value, a, b))
        }
        RepresentationCode::Isingl => read_u32_be(src).map(decode_isingl).map(Value::Isingl),
        RepresentationCode::Vsingl => read_array(src).map(decode_vsingl).map(Value::Vsingl),
        RepresentationCode::Fdoubl => read_f64_be(src).map(Value::Fdoubl),
        RepresentationCode::Fdoub1 => {
            let value = read_f64_be(src)?;
            let bound = read_f64_be(src)?;
            Ok(Value::Fdoub1(value, bound))
        }
        RepresentationCode::Fdoub2 => {
            let value = read_f64_be(src)?;
            let a = read_f64_be(src)?;
            let b = read_f64_be(src)?;
            Ok(Value::Fdoub2(value, a, b))
        }
        RepresentationCode::Csingl => {
            let re = read_f32_be(src)?;
            let im = read_f32_be(src)?;
            Ok(Value::Csingl(re, im))
        }
        RepresentationCode::Cdoubl => {
            let re = read_f64_be(src)?;
            let im = read_f64_be(src)?;
            Ok(Value::Cdoubl(re, im))
        }
        RepresentationCode::Sshort => read_i8(src).map(Value::Sshort),
        RepresentationCode::Snorm => read_i16_be(src).map(Value::Snorm),
        RepresentationCode::Slong => read_i32_be(src).map(Value::Slong),
        RepresentationCode::Ushort => read_u8(src).map(Value::Ushort),
        RepresentationCode::Unorm => read_u16_be(src).map(Value::Unorm),
        RepresentationCode::Ulong => read_u32_be(src).map(Value::Ulong),
        RepresentationCode::Uvari => read_uvari(src).map(Value::Uvari),
        RepresentationCode::Ident => read_ident(src).map(Value::Ident),
        RepresentationCode::Ascii => read_ascii(src).map(Value::Ascii),
        RepresentationCode::Dtime => read_dtime(src).map(Value::Dtime),
        RepresentationCode::Origin => read_uvari(src).map(Value::Origin),
        RepresentationCode::Obname => read_obname(src).map(Value::Obname),
        RepresentationCode::Objref => read_objref(src).map(Value::Objref),
        RepresentationCode::Attref => read_attref(src).map(Value::Attref),
        RepresentationCode::Status => read_u8(src).map(|n| Value::Status(n != 0)),
        RepresentationCode::Units => read_ident(src).map(Value::Units),
    }
}

/// Reads `count` values with the given representation code.
pub fn read_values(src: &mut &[u8], code: RepresentationCode, count: usize) -> io::Result<Vec<Value>> {
    // Every value takes at least one byte.
    if count > src.len() {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
    }

    (0..count).map(|_| read_value(src, code)).collect()
}

pub(crate) fn read_ident(src: &mut &[u8]) -> io::Result<BString> {
    let len = read_u8(src).map(usize::from)?;
    read_bytes(src, len).map(BString::from)
}

fn read_ascii(src: &mut &[u8]) -> io::Result<BString> {
    let len = read_uvari(src)?;
    let len = usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    read_bytes(src, len).map(BString::from)
}

fn read_dtime(src: &mut &[u8]) -> io::Result<DateTime> {
    let [year, tz_month, day, hour, minute, second] = read_array(src)?;
    let millisecond = read_u16_be(src)?;

    Ok(DateTime {
        year: DateTime::BASE_YEAR + u16::from(year),
        time_zone: TimeZone::from(tz_month >> 4),
        month: tz_month & 0x0f,
        day,
        hour,
        minute,
        second,
        millisecond,
    })
}

pub(crate) fn read_obname(src: &mut &[u8]) -> io::Result<ObjectName> {
    let origin = read_uvari(src)?;
    let copy_number = read_u8(src)?;
    let identifier = read_ident(src)?;

    Ok(ObjectName {
        origin,
        copy_number,
        identifier,
    })
}

fn read_objref(src: &mut &[u8]) -> io::Result<ObjectReference> {
    let set_type = read_ident(src)?;
    let name = read_obname(src)?;
    Ok(ObjectReference { set_type, name })
}

fn read_attref(src: &mut &[u8]) -> io::Result<AttributeReference> {
    let set_type = read_ident(src)?;
    let name = read_obname(src)?;
    let label = read_ident(src)?;

    Ok(AttributeReference {
        set_type,
        name,
        label,
    })
}

/// Decodes a low precision float (`FSHORT`).
///
/// The upper 12 bits are a two's complement fraction with 11 fractional bits, and the lower 4
/// bits are an unsigned power of 2.
pub(crate) fn decode_fshort(n: u16) -> f32 {
    let fraction = (n as i16) >> 4;
    let exponent = i32::from(n & 0x0f);
    f32::from(fraction) / 2048.0 * 2f32.powi(exponent)
}

/// Decodes an IBM System/360 single precision float (`ISINGL`).
///
/// The layout is a sign bit, a 7-bit excess-64 power of 16, and a 24-bit fraction.
pub(crate) fn decode_isingl(n: u32) -> f64 {
    let sign = if n >> 31 == 0 { 1.0 } else { -1.0 };
    let exponent = ((n >> 24) & 0x7f) as i32 - 64;
    let fraction = f64::from(n & 0x00ff_ffff) / f64::from(1u32 << 24);
    sign * fraction * 16f64.powi(exponent)
}

/// Decodes a VAX F-floating single precision float (`VSINGL`).
///
/// The bytes are stored as two little-endian 16-bit words, high word first. An exponent of 0
/// is zero, regardless of the sign and fraction.
pub(crate) fn decode_vsingl(buf: [u8; 4]) -> f64 {
    let [b0, b1, b2, b3] = buf;
    let n = u32::from_be_bytes([b1, b0, b3, b2]);

    let exponent = ((n >> 23) & 0xff) as i32;

    if exponent == 0 {
        return 0.0;
    }

    let sign = if n >> 31 == 0 { 1.0 } else { -1.0 };
    let fraction = 0.5 + f64::from(n & 0x007f_ffff) / f64::from(1u32 << 24);
    sign * fraction * 2f64.powi(exponent - 128)
}
