//! DLIS value encoder.

use std::{
    fmt,
    io::{self, Write},
};

use super::num::{
    write_f32_be, write_f64_be, write_i8, write_i16_be, write_i32_be, write_u8, write_u16_be,
    write_u32_be, write_uvari,
};
use crate::{
    Value,
    value::{AttributeReference, DateTime, ObjectName, ObjectReference},
};

/// Writes a value.
///
/// The value is encoded with its own representation code.
///
/// # Examples
///
/// ```
/// use dlis::{Value, io::writer::value::write_value};
///
/// let mut buf = Vec::new();
/// write_value(&mut buf, &Value::Ident("GR".into()))?;
/// assert_eq!(buf, [0x02, b'G', b'R']);
/// # Ok::<_, std::io::Error>(())
/// ```
pub fn write_value<W>(writer: &mut W, value: &Value) -> io::Result<()>
where
    W: Write,
{
    match value {
        Value::Fshort(n) => encode_fshort(*n).and_then(|m| write_u16_be(writer, m)),
        Value::Fsingl(n) => write_f32_be(writer, *n),
        Value::Fsing1(n, bound) => {
            write_f32_be(writer, *n)?;
            write_f32_be(writer, *bound)
        }
        Value::Fsing2(n, a, b) => {
            write_f32_be(writer, *n)?;
            write_f32_be(writer, *a)?;
            write_f32_be(writer, *b)
        }
        Value::Isingl(n) => encode_isingl(*n).and_then(|m| write_u32_be(writer, m)),
        Value::Vsingl(n) => encode_vsingl(*n).and_then(|buf| writer.write_all(&buf)),
        Value::Fdoubl(n) => write_f64_be(writer, *n),
        Value::Fdoub1(n, bound) => {
            write_f64_be(writer, *n)?;
            write_f64_be(writer, *bound)
        }
        Value::Fdoub2(n, a, b) => {
            write_f64_be(writer, *n)?;
            write_f64_be(writer, *a)?;
            write_f64_be(writer, *b)
        }
        Value::Csingl(re, im) => {
            write_f32_be(writer, *re)?;
            write_f32_be(writer, *im)
        }
        Value::Cdoubl(re, im) => {
            write_f64_be(writer, *re)?;
            write_f64_be(writer, *im)
        }
        Value::Sshort(n) => write_i8(writer, *n),
        Value::Snorm(n) => write_i16_be(writer, *n),
        Value::Slong(n) => write_i32_be(writer, *n),
        Value::Ushort(n) => write_u8(writer, *n),
        Value::Unorm(n) => write_u16_be(writer, *n),
        Value::Ulong(n) => write_u32_be(writer, *n),
        Value::Uvari(n) | Value::Origin(n) => write_uvari(writer, *n),
        Value::Ident(s) | Value::Units(s) => write_ident(writer, s),
        Value::Ascii(s) => write_ascii(writer, s),
        Value::Dtime(date_time) => write_dtime(writer, date_time),
        Value::Obname(name) => write_obname(writer, name),
        Value::Objref(reference) => write_objref(writer, reference),
        Value::Attref(reference) => write_attref(writer, reference),
        Value::Status(b) => write_u8(writer, u8::from(*b)),
    }
}

pub(crate) fn write_ident<W>(writer: &mut W, s: &[u8]) -> io::Result<()>
where
    W: Write,
{
    let len = u8::try_from(s.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    write_u8(writer, len)?;
    writer.write_all(s)
}

fn write_ascii<W>(writer: &mut W, s: &[u8]) -> io::Result<()>
where
    W: Write,
{
    let len = u32::try_from(s.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    write_uvari(writer, len)?;
    writer.write_all(s)
}

fn write_dtime<W>(writer: &mut W, date_time: &DateTime) -> io::Result<()>
where
    W: Write,
{
    let year = date_time
        .year
        .checked_sub(DateTime::BASE_YEAR)
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("DTIME year out of range: {}", date_time.year),
            )
        })?;

    let time_zone = u8::from(date_time.time_zone);

    if time_zone > 0x0f || date_time.month > 0x0f {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DTIME time zone or month out of range",
        ));
    }

    writer.write_all(&[
        year,
        (time_zone << 4) | date_time.month,
        date_time.day,
        date_time.hour,
        date_time.minute,
        date_time.second,
    ])?;

    write_u16_be(writer, date_time.millisecond)
}

pub(crate) fn write_obname<W>(writer: &mut W, name: &ObjectName) -> io::Result<()>
where
    W: Write,
{
    write_uvari(writer, name.origin)?;
    write_u8(writer, name.copy_number)?;
    write_ident(writer, &name.identifier)
}

fn write_objref<W>(writer: &mut W, reference: &ObjectReference) -> io::Result<()>
where
    W: Write,
{
    write_ident(writer, &reference.set_type)?;
    write_obname(writer, &reference.name)
}

fn write_attref<W>(writer: &mut W, reference: &AttributeReference) -> io::Result<()>
where
    W: Write,
{
    write_ident(writer, &reference.set_type)?;
    write_obname(writer, &reference.name)?;
    write_ident(writer, &reference.label)
}

fn out_of_range<N>(name: &str, n: N) -> io::Error
where
    N: fmt::Display,
{
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{name} value out of range: {n}"),
    )
}

/// Encodes a low precision float (`FSHORT`).
///
/// This uses the smallest exponent that fits the fraction in 12 bits, which keeps the most
/// precision.
pub(crate) fn encode_fshort(n: f32) -> io::Result<u16> {
    const MIN_FRACTION: f64 = -2048.0;
    const MAX_FRACTION: f64 = 2047.0;

    if !n.is_finite() {
        return Err(out_of_range("FSHORT", n));
    }

    let x = f64::from(n);

    for exponent in 0..=15 {
        let fraction = (x * 2048.0 / f64::from(1u32 << exponent)).round();

        if (MIN_FRACTION..=MAX_FRACTION).contains(&fraction) {
            let fraction = fraction as i16 as u16;
            return Ok((fraction << 4) | exponent as u16);
        }
    }

    Err(out_of_range("FSHORT", n))
}

const MIN_ISINGL_EXPONENT: i32 = -64;
const MAX_ISINGL_EXPONENT: i32 = 63;

/// Encodes an IBM System/360 single precision float (`ISINGL`).
///
/// Values below the smallest normalized IBM float are written unnormalized.
pub(crate) fn encode_isingl(n: f64) -> io::Result<u32> {
    if !n.is_finite() {
        return Err(out_of_range("ISINGL", n));
    }

    let sign = if n.is_sign_negative() { 1 << 31 } else { 0 };

    let mut x = n.abs();
    let mut exponent = 0i32;

    while x >= 1.0 {
        x /= 16.0;
        exponent += 1;
    }

    while x < 1.0 / 16.0 && exponent > MIN_ISINGL_EXPONENT {
        x *= 16.0;
        exponent -= 1;
    }

    let mut fraction = (x * f64::from(1u32 << 24)).round() as u32;

    if fraction == 0 {
        return Ok(0);
    }

    if fraction >= 1 << 24 {
        fraction >>= 4;
        exponent += 1;
    }

    if exponent > MAX_ISINGL_EXPONENT {
        return Err(out_of_range("ISINGL", n));
    }

    let biased_exponent = (exponent - MIN_ISINGL_EXPONENT) as u32;

    Ok(sign | (biased_exponent << 24) | fraction)
}

/// Encodes a VAX F-floating single precision float (`VSINGL`).
///
/// Values too small for the VAX exponent range encode as zero.
pub(crate) fn encode_vsingl(n: f64) -> io::Result<[u8; 4]> {
    if !n.is_finite() {
        return Err(out_of_range("VSINGL", n));
    }

    if n == 0.0 {
        return Ok([0; 4]);
    }

    let bits = n.to_bits();

    let sign = ((bits >> 63) as u32) << 31;
    let exponent = ((bits >> 52) & 0x7ff) as i32 - 1022 + 128;
    let fraction = ((bits >> 29) & 0x007f_ffff) as u32;

    if exponent <= 0 {
        return Ok([0; 4]);
    }

    if exponent > 0xff {
        return Err(out_of_range("VSINGL", n));
    }

    let m = sign | ((exponent as u32) << 23) | fraction;

    Ok([(m >> 16) as u8, (m >> 24) as u8, m as u8, (m >> 8) as u8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RepresentationCode,
        io::reader::value::read_value,
        value::TimeZone,
    };

    #[test]
    fn test_write_value() -> io::Result<()> {
        fn t(buf: &mut Vec<u8>, value: &Value, expected: &[u8]) -> io::Result<()> {
            buf.clear();
            write_value(buf, value)?;
            assert_eq!(buf, expected, "{value:?}");
            Ok(())
        }

        let mut buf = Vec::new();

        t(&mut buf, &Value::Fshort(153.0), &[0x4c, 0x88])?;
        t(&mut buf, &Value::Fshort(-153.0), &[0xb3, 0x88])?;
        t(&mut buf, &Value::Isingl(153.0), &[0x42, 0x99, 0x00, 0x00])?;
        t(&mut buf, &Value::Isingl(-118.625), &[0xc2, 0x76, 0xa0, 0x00])?;
        t(&mut buf, &Value::Vsingl(153.0), &[0x19, 0x44, 0x00, 0x00])?;
        t(&mut buf, &Value::Vsingl(1.0), &[0x80, 0x40, 0x00, 0x00])?;
        t(&mut buf, &Value::Vsingl(0.0), &[0x00, 0x00, 0x00, 0x00])?;
        t(&mut buf, &Value::Status(true), &[0x01])?;
        t(&mut buf, &Value::Uvari(1), &[0x01])?;
        t(&mut buf, &Value::Ascii("".into()), &[0x00])?;

        t(
            &mut buf,
            &Value::Dtime(DateTime::new(
                1987,
                4,
                19,
                21,
                20,
                15,
                620,
                TimeZone::LocalDaylightSavings,
            )),
            &[0x57, 0x14, 0x13, 0x15, 0x14, 0x0f, 0x02, 0x6c],
        )?;

        t(
            &mut buf,
            &Value::Obname(ObjectName::new(1, 0, "GR")),
            &[0x01, 0x00, 0x02, b'G', b'R'],
        )?;

        Ok(())
    }

    #[test]
    fn test_write_value_with_out_of_range_values() {
        fn t(value: Value) {
            let mut buf = Vec::new();

            assert!(
                matches!(
                    write_value(&mut buf, &value),
                    Err(e) if e.kind() == io::ErrorKind::InvalidInput
                ),
                "{value:?}"
            );
        }

        t(Value::Fshort(1e9));
        t(Value::Fshort(f32::NAN));
        t(Value::Isingl(f64::INFINITY));
        t(Value::Isingl(1.0e76));
        t(Value::Vsingl(1.0e39));
        t(Value::Uvari(1 << 30));
        t(Value::Ident(vec![b'A'; 256].into()));
        t(Value::Dtime(DateTime::new(
            1899,
            1,
            1,
            0,
            0,
            0,
            0,
            TimeZone::Gmt,
        )));
    }

    #[test]
    fn test_read_value_then_write_value_with_extreme_exponents() -> io::Result<()> {
        fn t(src: [u8; 4], code: RepresentationCode) -> io::Result<()> {
            let value = read_value(&mut &src[..], code)?;

            let mut buf = Vec::new();
            write_value(&mut buf, &value)?;
            assert_eq!(buf, src, "{value:?}");

            Ok(())
        }

        t([0x7f, 0x10, 0x00, 0x00], RepresentationCode::Isingl)?;
        t([0x7f, 0xff, 0xff, 0xff], RepresentationCode::Isingl)?;
        t([0xff, 0xff, 0xff, 0xff], RepresentationCode::Isingl)?;
        t([0x00, 0x10, 0x00, 0x00], RepresentationCode::Isingl)?;
        // unnormalized
        t([0x00, 0x00, 0x00, 0x01], RepresentationCode::Isingl)?;
        t([0x80, 0x00, 0x00, 0x01], RepresentationCode::Isingl)?;

        t([0x80, 0x00, 0x00, 0x00], RepresentationCode::Vsingl)?;
        t([0x80, 0x80, 0x00, 0x00], RepresentationCode::Vsingl)?;
        t([0xff, 0x7f, 0xff, 0xff], RepresentationCode::Vsingl)?;

        Ok(())
    }

    #[test]
    fn test_write_value_then_read_value() -> io::Result<()> {
        let values = [
            Value::Fshort(0.0),
            Value::Fshort(-0.5),
            Value::Fshort(2047.0 * 16.0),
            Value::Fsingl(f32::MIN),
            Value::Fsing1(1.5, 0.25),
            Value::Fsing2(-1.0, 0.5, 0.75),
            Value::Isingl(0.0),
            Value::Isingl(-1.0),
            Value::Isingl(0.0625),
            Value::Vsingl(-0.5),
            Value::Vsingl(f64::from(1.0e-30f32)),
            Value::Fdoubl(f64::MAX),
            Value::Fdoub1(0.0, 1.0),
            Value::Fdoub2(1.0, 0.0, 2.0),
            Value::Csingl(1.0, -1.0),
            Value::Cdoubl(-2.5, 2.5),
            Value::Sshort(i8::MIN),
            Value::Snorm(i16::MIN),
            Value::Slong(i32::MAX),
            Value::Ushort(u8::MAX),
            Value::Unorm(u16::MAX),
            Value::Ulong(u32::MAX),
            Value::Uvari(0),
            Value::Uvari(16384),
            Value::Ident("".into()),
            Value::Ascii(vec![b'x'; 200].into()),
            Value::Dtime(DateTime::new(2155, 12, 31, 23, 59, 59, 999, TimeZone::Gmt)),
            Value::Origin(42),
            Value::Obname(ObjectName::new(300, 255, "GR")),
            Value::Objref(ObjectReference::new(
                "CHANNEL",
                ObjectName::new(1, 0, "GR"),
            )),
            Value::Attref(AttributeReference::new(
                "CHANNEL",
                ObjectName::new(1, 0, "GR"),
                "UNITS",
            )),
            Value::Status(false),
            Value::Units("gAPI".into()),
        ];

        let mut buf = Vec::new();

        for value in values {
            buf.clear();
            write_value(&mut buf, &value)?;

            let code: RepresentationCode = value.representation_code();
            let mut src = &buf[..];
            assert_eq!(read_value(&mut src, code)?, value);
            assert!(src.is_empty(), "{code}");
        }

        Ok(())
    }
}
