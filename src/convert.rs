use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::{BsDate, CalendarTable, Day, Month, prelude::*};

/// The calendar a year number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Calendar {
    #[display(fmt = "AD")]
    Gregorian,
    #[display(fmt = "BS")]
    BikramSambat,
}

/// Error type for conversions between the two calendars.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The year falls outside the calendar table's coverage.
    #[error("Year {year} {calendar} is not covered by the calendar table")]
    UnsupportedYear { year: i32, calendar: Calendar },

    /// The month or day does not exist in the given BS year.
    #[error("Invalid BS date {year:04}-{month:02}-{day:02}")]
    InvalidBsDate { year: u16, month: u8, day: u8 },
}

impl CalendarTable {
    /// Builds a `BsDate`, checking the day against this table's month length.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table
    /// and `ConvertError::InvalidBsDate` if the month or day does not exist.
    pub fn date(&self, year: u16, month: u8, day: u8) -> Result<BsDate, ConvertError> {
        let invalid = ConvertError::InvalidBsDate { year, month, day };
        let lengths = self.month_lengths(year)?;
        let month = Month::new(month).map_err(|_| invalid.clone())?;
        let day = Day::new(day).map_err(|_| invalid.clone())?;
        if day.get() > lengths[month.index()] {
            return Err(invalid);
        }
        Ok(BsDate::from_parts(year, month, day))
    }

    /// Converts a Gregorian date to Bikram Sambat.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the date falls before the
    /// first year or after the last year of the table.
    pub fn to_bikram_sambat(&self, date: NaiveDate) -> Result<BsDate, ConvertError> {
        let days = date.num_days_from_ce();
        let Some(idx) = self.index_of_day(days) else {
            debug!("{date} is outside the calendar table");
            return Err(ConvertError::UnsupportedYear {
                year: date.year(),
                calendar: Calendar::Gregorian,
            });
        };
        let anchor = self.anchor_days(idx);
        let year = self.first_year() + idx as u16;
        let lengths = self.month_lengths(year)?;

        let mut offset = days - anchor;
        for (month, &len) in (1..).zip(lengths.iter()) {
            let len = i32::from(len);
            if offset < len {
                return self.date(year, month, (offset + 1) as u8);
            }
            offset -= len;
        }
        // index_of_day only returns years whose span holds `days`
        Err(ConvertError::UnsupportedYear {
            year: date.year(),
            calendar: Calendar::Gregorian,
        })
    }

    /// Converts a Bikram Sambat date to Gregorian.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table
    /// and `ConvertError::InvalidBsDate` if the day does not exist in this
    /// table's version of the month.
    pub fn to_gregorian(&self, date: BsDate) -> Result<NaiveDate, ConvertError> {
        let idx = self.year_index(date.year())?;
        let lengths = self.month_lengths(date.year())?;
        let month = date.month_typed().index();
        if date.day() > lengths[month] {
            return Err(ConvertError::InvalidBsDate {
                year: date.year(),
                month: date.month(),
                day: date.day(),
            });
        }

        let before: i32 = lengths[..month].iter().map(|&len| i32::from(len)).sum();
        let anchor = self.anchor_days(idx);
        NaiveDate::from_num_days_from_ce_opt(anchor + before + i32::from(date.day()) - 1).ok_or(
            ConvertError::UnsupportedYear {
                year: i32::from(date.year()),
                calendar: Calendar::BikramSambat,
            },
        )
    }

    /// Moves a BS date forward (or backward, for negative `days`) by a number
    /// of days.
    ///
    /// # Errors
    /// Returns `ConvertError` if either end of the move falls outside the
    /// table.
    pub fn checked_add_days(&self, date: BsDate, days: i64) -> Result<BsDate, ConvertError> {
        let start = self.to_gregorian(date)?;
        let out_of_range = || ConvertError::UnsupportedYear {
            year: i32::from(date.year()),
            calendar: Calendar::BikramSambat,
        };
        let shifted = chrono::Duration::try_days(days)
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or_else(out_of_range)?;
        self.to_bikram_sambat(shifted)
    }
}
