use std::fmt;

/// A `DTIME` time zone.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimeZone {
    /// Local standard time.
    #[default]
    LocalStandard,
    /// Local daylight savings time.
    LocalDaylightSavings,
    /// Greenwich Mean Time.
    Gmt,
    /// A time zone code not defined by RP66 V1 (3..=15).
    Other(u8),
}

impl From<u8> for TimeZone {
    fn from(n: u8) -> Self {
        match n {
            0 => Self::LocalStandard,
            1 => Self::LocalDaylightSavings,
            2 => Self::Gmt,
            _ => Self::Other(n),
        }
    }
}

impl From<TimeZone> for u8 {
    fn from(time_zone: TimeZone) -> Self {
        match time_zone {
            TimeZone::LocalStandard => 0,
            TimeZone::LocalDaylightSavings => 1,
            TimeZone::Gmt => 2,
            TimeZone::Other(n) => n,
        }
    }
}

/// A `DTIME` date and time.
///
/// Fields are stored as written. RP66 does not require them to form a valid calendar date.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateTime {
    pub(crate) year: u16,
    pub(crate) time_zone: TimeZone,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) millisecond: u16,
}

impl DateTime {
    /// The year that a stored year offset of 0 represents.
    pub const BASE_YEAR: u16 = 1900;

    /// Creates a date and time.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlis::value::{DateTime, TimeZone};
    /// let date_time = DateTime::new(1987, 4, 19, 21, 20, 15, 620, TimeZone::LocalDaylightSavings);
    /// assert_eq!(date_time.year(), 1987);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            year,
            time_zone,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Returns the full year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Returns the time zone.
    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    /// Returns the month (1..=12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day of the month.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Returns the hour (0..=23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute.
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second.
    pub fn second(&self) -> u8 {
        self.second
    }

    /// Returns the millisecond.
    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}
