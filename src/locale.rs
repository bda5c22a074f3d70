//! Nepali names and numerals.
//!
//! Weekdays are numbered from Sunday (`0`, आइतबार) through Saturday (`6`,
//! शनिबार), matching `chrono::Weekday::num_days_from_sunday`.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::{
    BsDate, CalendarTable,
    consts::{DAYS_PER_WEEK, MONTHS_PER_YEAR},
    convert::ConvertError,
};

/// Month names, Baisakh first
pub const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "बैशाख", "जेठ", "असार", "साउन", "भदौ", "असोज", "कात्तिक", "मंसिर", "पुष", "माघ", "फागुन", "चैत",
];

/// Weekday names, Sunday first
pub const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] =
    ["आइतबार", "सोमबार", "मंगलबार", "बुधबार", "बिहीबार", "शुक्रबार", "शनिबार"];

/// Devanagari digits 0 through 9
pub const NUMERAL_GLYPHS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Nepali name of the weekday `date` falls on.
pub fn weekday_of(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Replaces every ASCII digit in `text` with its Devanagari glyph.
/// Anything else, including digits that are already Devanagari, is kept.
pub fn localize_str(text: &str) -> String {
    text.chars()
        .map(|c| c.to_digit(10).map_or(c, |d| NUMERAL_GLYPHS[d as usize]))
        .collect()
}

/// Writes `n` in base 10 with Devanagari digits, e.g. `2081` as `"२०८१"`.
/// A leading minus sign is kept as is.
pub fn localize_digits(n: i64) -> String {
    localize_str(&n.to_string())
}

/// A BS date together with the names a display needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalizedDate {
    pub date:       BsDate,
    pub weekday:    &'static str,
    pub month_name: &'static str,
}

impl fmt::Display for LocalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {} {}",
            self.weekday,
            localize_digits(self.date.day().into()),
            self.month_name,
            localize_digits(self.date.year().into())
        )
    }
}

impl CalendarTable {
    /// Converts `date` and attaches its weekday and month names.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the date is outside the table.
    pub fn localize(&self, date: NaiveDate) -> Result<LocalizedDate, ConvertError> {
        let bs = self.to_bikram_sambat(date)?;
        Ok(LocalizedDate {
            date:       bs,
            weekday:    weekday_of(date),
            month_name: bs.month_typed().name(),
        })
    }
}
