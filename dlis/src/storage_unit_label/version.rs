use std::{cmp::Ordering, error, fmt, str::FromStr};

/// A DLIS version.
///
/// This is the `Vn.mm` field of the storage unit label.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Version {
    major: u8,
    minor: u8,
}

impl Version {
    /// RP66 V1.00
    pub const V1_0: Self = Self::new(1, 0);

    /// Creates a DLIS version.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::storage_unit_label::Version;
    /// let version = Version::new(1, 0);
    /// ```
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Returns the major version.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::storage_unit_label::Version;
    /// let version = Version::new(1, 0);
    /// assert_eq!(version.major(), 1);
    /// ```
    pub fn major(&self) -> u8 {
        self.major
    }

    /// Returns the minor version.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::storage_unit_label::Version;
    /// let version = Version::new(1, 0);
    /// assert_eq!(version.minor(), 0);
    /// ```
    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Returns whether this version uses RP66 V1 framing.
    pub fn is_v1(&self) -> bool {
        self.major == 1
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::V1_0
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}.{:02}", self.major, self.minor)
    }
}

/// An error returned when a DLIS version fails to parse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError(String);

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid DLIS version: {:?}", self.0)
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError(s.into());

        let rest = s.strip_prefix('V').ok_or_else(invalid)?;
        let (major, minor) = rest.split_once('.').ok_or_else(invalid)?;

        if major.len() != 1 || minor.len() != 2 {
            return Err(invalid());
        }

        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;

        Ok(Self::new(major, minor))
    }
}
