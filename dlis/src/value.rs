//! DLIS values.

mod date_time;
mod object_name;

pub use self::{
    date_time::{DateTime, TimeZone},
    object_name::{AttributeReference, ObjectName, ObjectReference},
};

use bstr::BString;

use crate::RepresentationCode;

/// A decoded DLIS value.
///
/// There is one variant per representation code, so a value always knows how it is encoded.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `FSHORT`.
    Fshort(f32),
    /// `FSINGL`.
    Fsingl(f32),
    /// `FSING1`: a value and its bound.
    Fsing1(f32, f32),
    /// `FSING2`: a value and its lower and upper bounds.
    Fsing2(f32, f32, f32),
    /// `ISINGL`.
    ///
    /// IBM floats have a wider exponent range than IEEE single precision floats, so the value
    /// is held as a double.
    Isingl(f64),
    /// `VSINGL`.
    ///
    /// VAX floats below the IEEE single precision normal range are held exactly as a double.
    Vsingl(f64),
    /// `FDOUBL`.
    Fdoubl(f64),
    /// `FDOUB1`: a value and its bound.
    Fdoub1(f64, f64),
    /// `FDOUB2`: a value and its lower and upper bounds.
    Fdoub2(f64, f64, f64),
    /// `CSINGL`: real and imaginary parts.
    Csingl(f32, f32),
    /// `CDOUBL`: real and imaginary parts.
    Cdoubl(f64, f64),
    /// `SSHORT`.
    Sshort(i8),
    /// `SNORM`.
    Snorm(i16),
    /// `SLONG`.
    Slong(i32),
    /// `USHORT`.
    Ushort(u8),
    /// `UNORM`.
    Unorm(u16),
    /// `ULONG`.
    Ulong(u32),
    /// `UVARI`.
    Uvari(u32),
    /// `IDENT`.
    Ident(BString),
    /// `ASCII`.
    Ascii(BString),
    /// `DTIME`.
    Dtime(DateTime),
    /// `ORIGIN`.
    Origin(u32),
    /// `OBNAME`.
    Obname(ObjectName),
    /// `OBJREF`.
    Objref(ObjectReference),
    /// `ATTREF`.
    Attref(AttributeReference),
    /// `STATUS`.
    Status(bool),
    /// `UNITS`.
    Units(BString),
}

impl Value {
    /// Returns the representation code of the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::{RepresentationCode, Value};
    /// assert_eq!(Value::Fdoubl(0.5).representation_code(), RepresentationCode::Fdoubl);
    /// ```
    pub fn representation_code(&self) -> RepresentationCode {
        match self {
            Self::Fshort(_) => RepresentationCode::Fshort,
            Self::Fsingl(_) => RepresentationCode::Fsingl,
            Self::Fsing1(..) => RepresentationCode::Fsing1,
            Self::Fsing2(..) => RepresentationCode::Fsing2,
            Self::Isingl(_) => RepresentationCode::Isingl,
            Self::Vsingl(_) => RepresentationCode::Vsingl,
            Self::Fdoubl(_) => RepresentationCode::Fdoubl,
            Self::Fdoub1(..) => RepresentationCode::Fdoub1,
            Self::Fdoub2(..) => RepresentationCode::Fdoub2,
            Self::Csingl(..) => RepresentationCode::Csingl,
            Self::Cdoubl(..) => RepresentationCode::Cdoubl,
            Self::Sshort(_) => RepresentationCode::Sshort,
            Self::Snorm(_) => RepresentationCode::Snorm,
            Self::Slong(_) => RepresentationCode::Slong,
            Self::Ushort(_) => RepresentationCode::Ushort,
            Self::Unorm(_) => RepresentationCode::Unorm,
            Self::Ulong(_) => RepresentationCode::Ulong,
            Self::Uvari(_) => RepresentationCode::Uvari,
            Self::Ident(_) => RepresentationCode::Ident,
            Self::Ascii(_) => RepresentationCode::Ascii,
            Self::Dtime(_) => RepresentationCode::Dtime,
            Self::Origin(_) => RepresentationCode::Origin,
            Self::Obname(_) => RepresentationCode::Obname,
            Self::Objref(_) => RepresentationCode::Objref,
            Self::Attref(_) => RepresentationCode::Attref,
            Self::Status(_) => RepresentationCode::Status,
            Self::Units(_) => RepresentationCode::Units,
        }
    }

    /// Returns the value as a floating point number, if it is numeric.
    ///
    /// Validated and complex values return their primary (or real) component.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::Value;
    /// assert_eq!(Value::Snorm(-3).as_f64(), Some(-3.0));
    /// assert_eq!(Value::Fsing1(1.5, 0.25).as_f64(), Some(1.5));
    /// assert_eq!(Value::Ident("GR".into()).as_f64(), None);
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Fshort(n)
            | Self::Fsingl(n)
            | Self::Fsing1(n, _)
            | Self::Fsing2(n, _, _)
            | Self::Csingl(n, _) => Some(f64::from(n)),
            Self::Isingl(n)
            | Self::Vsingl(n)
            | Self::Fdoubl(n)
            | Self::Fdoub1(n, _)
            | Self::Fdoub2(n, _, _)
            | Self::Cdoubl(n, _) => Some(n),
            Self::Sshort(n) => Some(f64::from(n)),
            Self::Snorm(n) => Some(f64::from(n)),
            Self::Slong(n) => Some(f64::from(n)),
            Self::Ushort(n) => Some(f64::from(n)),
            Self::Unorm(n) => Some(f64::from(n)),
            Self::Ulong(n) | Self::Uvari(n) | Self::Origin(n) => Some(f64::from(n)),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer, if it is a nonnegative integer.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Self::Ushort(n) => Some(u32::from(n)),
            Self::Unorm(n) => Some(u32::from(n)),
            Self::Ulong(n) | Self::Uvari(n) | Self::Origin(n) => Some(n),
            Self::Sshort(n) => u32::try_from(n).ok(),
            Self::Snorm(n) => u32::try_from(n).ok(),
            Self::Slong(n) => u32::try_from(n).ok(),
            _ => None,
        }
    }

    /// Returns the character data of a string-like value (`IDENT`, `ASCII`, or `UNITS`).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ident(s) | Self::Ascii(s) | Self::Units(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Returns the object name of an `OBNAME` value.
    pub fn as_object_name(&self) -> Option<&ObjectName> {
        match self {
            Self::Obname(name) => Some(name),
            Self::Objref(reference) => Some(reference.name()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_u32() {
        assert_eq!(Value::Ushort(8).as_u32(), Some(8));
        assert_eq!(Value::Uvari(1 << 20).as_u32(), Some(1 << 20));
        assert_eq!(Value::Sshort(-1).as_u32(), None);
        assert_eq!(Value::Fdoubl(1.0).as_u32(), None);
    }

    #[test]
    fn test_as_bytes() {
        assert_eq!(Value::Units("m".into()).as_bytes(), Some(&b"m"[..]));
        assert_eq!(Value::Ascii(BString::default()).as_bytes(), Some(&b""[..]));
        assert!(Value::Status(true).as_bytes().is_none());
    }
}
