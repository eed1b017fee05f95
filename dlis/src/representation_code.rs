//! DLIS representation codes.

use std::{error, fmt};

/// A DLIS representation code.
///
/// These are the value encodings defined by RP66 V1 Appendix B.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RepresentationCode {
    /// Low precision floating point (`FSHORT`, 1).
    Fshort,
    /// IEEE single precision floating point (`FSINGL`, 2).
    Fsingl,
    /// Validated single precision floating point (`FSING1`, 3).
    Fsing1,
    /// Two-way validated single precision floating point (`FSING2`, 4).
    Fsing2,
    /// IBM single precision floating point (`ISINGL`, 5).
    Isingl,
    /// VAX single precision floating point (`VSINGL`, 6).
    Vsingl,
    /// IEEE double precision floating point (`FDOUBL`, 7).
    Fdoubl,
    /// Validated double precision floating point (`FDOUB1`, 8).
    Fdoub1,
    /// Two-way validated double precision floating point (`FDOUB2`, 9).
    Fdoub2,
    /// Single precision complex (`CSINGL`, 10).
    Csingl,
    /// Double precision complex (`CDOUBL`, 11).
    Cdoubl,
    /// Short signed integer (`SSHORT`, 12).
    Sshort,
    /// Normal signed integer (`SNORM`, 13).
    Snorm,
    /// Long signed integer (`SLONG`, 14).
    Slong,
    /// Short unsigned integer (`USHORT`, 15).
    Ushort,
    /// Normal unsigned integer (`UNORM`, 16).
    Unorm,
    /// Long unsigned integer (`ULONG`, 17).
    Ulong,
    /// Variable-length unsigned integer (`UVARI`, 18).
    Uvari,
    /// Variable-length identifier (`IDENT`, 19).
    Ident,
    /// Variable-length ASCII character string (`ASCII`, 20).
    Ascii,
    /// Date and time (`DTIME`, 21).
    Dtime,
    /// Origin reference (`ORIGIN`, 22).
    Origin,
    /// Object name (`OBNAME`, 23).
    Obname,
    /// Object reference (`OBJREF`, 24).
    Objref,
    /// Attribute reference (`ATTREF`, 25).
    Attref,
    /// Boolean status (`STATUS`, 26).
    Status,
    /// Units expression (`UNITS`, 27).
    Units,
}

impl RepresentationCode {
    /// Returns the fixed encoded size of a value, if the code has one.
    ///
    /// Variable-length codes (`UVARI`, `IDENT`, `ASCII`, `ORIGIN`, `OBNAME`, `OBJREF`, `ATTREF`,
    /// and `UNITS`) return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::RepresentationCode;
    /// assert_eq!(RepresentationCode::Fdoubl.size(), Some(8));
    /// assert_eq!(RepresentationCode::Ident.size(), None);
    /// ```
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Fshort => Some(2),
            Self::Fsingl => Some(4),
            Self::Fsing1 => Some(8),
            Self::Fsing2 => Some(12),
            Self::Isingl => Some(4),
            Self::Vsingl => Some(4),
            Self::Fdoubl => Some(8),
            Self::Fdoub1 => Some(16),
            Self::Fdoub2 => Some(24),
            Self::Csingl => Some(8),
            Self::Cdoubl => Some(16),
            Self::Sshort => Some(1),
            Self::Snorm => Some(2),
            Self::Slong => Some(4),
            Self::Ushort => Some(1),
            Self::Unorm => Some(2),
            Self::Ulong => Some(4),
            Self::Dtime => Some(8),
            Self::Status => Some(1),
            Self::Uvari
            | Self::Ident
            | Self::Ascii
            | Self::Origin
            | Self::Obname
            | Self::Objref
            | Self::Attref
            | Self::Units => None,
        }
    }

    /// Returns the RP66 mnemonic of the code.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Fshort => "FSHORT",
            Self::Fsingl => "FSINGL",
            Self::Fsing1 => "FSING1",
            Self::Fsing2 => "FSING2",
            Self::Isingl => "ISINGL",
            Self::Vsingl => "VSINGL",
            Self::Fdoubl => "FDOUBL",
            Self::Fdoub1 => "FDOUB1",
            Self::Fdoub2 => "FDOUB2",
            Self::Csingl => "CSINGL",
            Self::Cdoubl => "CDOUBL",
            Self::Sshort => "SSHORT",
            Self::Snorm => "SNORM",
            Self::Slong => "SLONG",
            Self::Ushort => "USHORT",
            Self::Unorm => "UNORM",
            Self::Ulong => "ULONG",
            Self::Uvari => "UVARI",
            Self::Ident => "IDENT",
            Self::Ascii => "ASCII",
            Self::Dtime => "DTIME",
            Self::Origin => "ORIGIN",
            Self::Obname => "OBNAME",
            Self::Objref => "OBJREF",
            Self::Attref => "ATTREF",
            Self::Status => "STATUS",
            Self::Units => "UNITS",
        }
    }
}

impl fmt::Display for RepresentationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// An error returned when a representation code is not defined by RP66 V1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnsupportedCodeError(pub u32);

impl error::Error for UnsupportedCodeError {}

impl fmt::Display for UnsupportedCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported representation code: {}", self.0)
    }
}

impl TryFrom<u8> for RepresentationCode {
    type Error = UnsupportedCodeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Fshort),
            2 => Ok(Self::Fsingl),
            3 => Ok(Self::Fsing1),
            4 => Ok(Self::Fsing2),
            5 => Ok(Self::Isingl),
            6 => Ok(Self::Vsingl),
            7 => Ok(Self::Fdoubl),
            8 => Ok(Self::Fdoub1),
            9 => Ok(Self::Fdoub2),
            10 => Ok(Self::Csingl),
            11 => Ok(Self::Cdoubl),
            12 => Ok(Self::Sshort),
            13 => Ok(Self::Snorm),
            14 => Ok(Self::Slong),
            15 => Ok(Self::Ushort),
            16 => Ok(Self::Unorm),
            17 => Ok(Self::Ulong),
            18 => Ok(Self::Uvari),
            19 => Ok(Self::Ident),
            20 => Ok(Self::Ascii),
            21 => Ok(Self::Dtime),
            22 => Ok(Self::Origin),
            23 => Ok(Self::Obname),
            24 => Ok(Self::Objref),
            25 => Ok(Self::Attref),
            26 => Ok(Self::Status),
            27 => Ok(Self::Units),
            _ => Err(UnsupportedCodeError(u32::from(n))),
        }
    }
}

impl From<RepresentationCode> for u8 {
    fn from(code: RepresentationCode) -> Self {
        match code {
            RepresentationCode::Fshort => 1,
            RepresentationCode::Fsingl => 2,
            RepresentationCode::Fsing1 => 3,
            RepresentationCode::Fsing2 => 4,
            RepresentationCode::Isingl => 5,
            RepresentationCode::Vsingl => 6,
            RepresentationCode::Fdoubl => 7,
            RepresentationCode::Fdoub1 => 8,
            RepresentationCode::Fdoub2 => 9,
            RepresentationCode::Csingl => 10,
            RepresentationCode::Cdoubl => 11,
            RepresentationCode::Sshort => 12,
            RepresentationCode::Snorm => 13,
            RepresentationCode::Slong => 14,
            RepresentationCode::Ushort => 15,
            RepresentationCode::Unorm => 16,
            RepresentationCode::Ulong => 17,
            RepresentationCode::Uvari => 18,
            RepresentationCode::Ident => 19,
            RepresentationCode::Ascii => 20,
            RepresentationCode::Dtime => 21,
            RepresentationCode::Origin => 22,
            RepresentationCode::Obname => 23,
            RepresentationCode::Objref => 24,
            RepresentationCode::Attref => 25,
            RepresentationCode::Status => 26,
            RepresentationCode::Units => 27,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_u8_for_representation_code() {
        for n in 1..=27 {
            let code = RepresentationCode::try_from(n);
            assert!(code.is_ok(), "{n}");
            assert_eq!(code.map(u8::from), Ok(n));
        }

        assert_eq!(
            RepresentationCode::try_from(0),
            Err(UnsupportedCodeError(0))
        );
        assert_eq!(
            RepresentationCode::try_from(28),
            Err(UnsupportedCodeError(28))
        );
        assert_eq!(
            RepresentationCode::try_from(30),
            Err(UnsupportedCodeError(30))
        );
    }

    #[test]
    fn test_fmt() {
        assert_eq!(RepresentationCode::Obname.to_string(), "OBNAME");
        assert_eq!(
            UnsupportedCodeError(66).to_string(),
            "unsupported representation code: 66"
        );
    }
}
