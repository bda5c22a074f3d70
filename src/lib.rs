//! Conversion between Gregorian and Bikram Sambat (BS) dates.
//!
//! BS months run 29 to 32 days and their lengths are published year by year,
//! so conversion is driven by a [`CalendarTable`] rather than a formula. The
//! crate ships one ([`CalendarTable::bundled`]); the free functions below use
//! it.
//!
//! ```
//! use bikram_sambat::{localize_digits, month_name, to_bikram_sambat};
//! use chrono::NaiveDate;
//!
//! let date = to_bikram_sambat(NaiveDate::from_ymd_opt(2024, 4, 13).unwrap()).unwrap();
//! assert_eq!(date.to_string(), "2081-01-01");
//! assert_eq!(month_name(date), "बैशाख");
//! assert_eq!(localize_digits(date.year().into()), "२०८१");
//! ```

mod consts;
mod convert;
mod data;
mod locale;
mod prelude;
mod table;
mod types;

pub use consts::*;
pub use convert::{Calendar, ConvertError};
pub use locale::{
    LocalizedDate, MONTH_NAMES, NUMERAL_GLYPHS, WEEKDAY_NAMES, localize_digits, localize_str,
};
pub use table::{CalendarTable, TableError};
pub use types::{Day, Month};

use crate::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A date in the Bikram Sambat calendar.
///
/// Months are 1-indexed: Baisakh is 1 and Chaitra is 12. A `BsDate` always
/// names a day that exists in the table it was built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year", "month.get()", "day.get()")]
pub struct BsDate {
    year:  u16,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {} (must be 1-{})", "_0", MAX_MONTH_DAYS)]
    InvalidDay(u8),
    #[display(fmt = "{_0}")]
    Date(ConvertError),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl From<ConvertError> for ParseError {
    fn from(err: ConvertError) -> Self {
        Self::Date(err)
    }
}

impl BsDate {
    /// Creates a date, validated against the bundled calendar table.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table
    /// and `ConvertError::InvalidBsDate` if the month or day does not exist.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ConvertError> {
        CalendarTable::bundled().date(year, month, day)
    }

    /// Assembles a date whose day the caller has already checked.
    pub(crate) const fn from_parts(year: u16, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Returns the BS year
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1 = Baisakh)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day of the month
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> Day {
        self.day
    }
}

impl FromStr for BsDate {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD` and checks the day against the bundled table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, got {s}"
            )));
        };

        let year = parse_number::<u16>(year)?;
        let month = Month::new(parse_number::<u8>(month)?)?;
        let day = Day::new(parse_number::<u8>(day)?)?;
        Ok(Self::new(year, month.get(), day.get())?)
    }
}

fn parse_number<T: FromStr>(s: &str) -> Result<T, ParseError> {
    s.parse::<T>().map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl Serialize for BsDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BsDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts a Gregorian date to Bikram Sambat using the bundled table.
///
/// # Errors
/// Returns `ConvertError::UnsupportedYear` if the date is outside the table.
pub fn to_bikram_sambat(date: NaiveDate) -> Result<BsDate, ConvertError> {
    CalendarTable::bundled().to_bikram_sambat(date)
}

/// Converts a Bikram Sambat date to Gregorian using the bundled table.
///
/// # Errors
/// Returns `ConvertError::UnsupportedYear` if the year is outside the table.
pub fn to_gregorian(date: BsDate) -> Result<NaiveDate, ConvertError> {
    CalendarTable::bundled().to_gregorian(date)
}

/// Nepali name of the weekday `date` falls on (Sunday is आइतबार).
pub fn weekday_name(date: NaiveDate) -> &'static str {
    locale::weekday_of(date)
}

/// Nepali name of the month of `date`.
pub const fn month_name(date: BsDate) -> &'static str {
    date.month.name()
}

/// The host's current local date in Bikram Sambat, with display names.
///
/// # Errors
/// Returns `ConvertError::UnsupportedYear` once the clock runs past the
/// bundled table.
pub fn today() -> Result<LocalizedDate, ConvertError> {
    CalendarTable::bundled().localize(chrono::Local::now().date_naive())
}
