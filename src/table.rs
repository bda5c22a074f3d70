use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize, ser::Error as _};

use crate::{
    consts::{MAX_MONTH_DAYS, MIN_MONTH_DAYS, MONTHS_PER_YEAR},
    convert::{Calendar, ConvertError},
    data, Month,
};

static BUNDLED: LazyLock<CalendarTable> = LazyLock::new(|| {
    CalendarTable::assemble(data::FIRST_YEAR, data::EPOCH_DAYS_FROM_CE, data::MONTH_LENGTHS.to_vec())
});

/// Month lengths for a contiguous run of Bikram Sambat years, anchored to the
/// Gregorian calendar.
///
/// Only the Gregorian date of the first year's 1 Baisakh is stored; every
/// later anchor is that epoch plus the lengths of the years before it, so
/// consecutive years can never disagree about where one ends and the next
/// begins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TableFile")]
pub struct CalendarTable {
    first_year: u16,
    months:     Vec<[u8; MONTHS_PER_YEAR]>,
    /// Days from CE of 1 Baisakh for each year, plus one trailing entry for
    /// the day after the last year ends.
    anchors:    Vec<i32>,
}

/// Error type for building a calendar table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// No years were supplied.
    #[error("Calendar table has no years")]
    Empty,

    /// A month length outside the range the calendar ever uses.
    #[error("Month {month} of BS {year} has {days} days (expected {min}-{max})", min = MIN_MONTH_DAYS, max = MAX_MONTH_DAYS)]
    MonthLength { year: u16, month: u8, days: u8 },

    /// The year range does not fit in a `u16`.
    #[error("Calendar table starting at BS {first_year} cannot hold {count} years")]
    YearOverflow { first_year: u16, count: usize },

    /// The table runs past the dates `chrono` can represent.
    #[error("BS {year} falls outside the representable Gregorian range")]
    DateOverflow { year: u16 },
}

/// On-disk shape of a table: the first year, its Gregorian new year's day and
/// one row of month lengths per year.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    first_year: u16,
    epoch:      NaiveDate,
    months:     Vec<[u8; MONTHS_PER_YEAR]>,
}

impl TryFrom<TableFile> for CalendarTable {
    type Error = TableError;

    fn try_from(file: TableFile) -> Result<Self, Self::Error> {
        Self::new(file.first_year, file.epoch, file.months).inspect_err(|err| {
            warn!("rejecting calendar table starting at BS {}: {err}", file.first_year);
        })
    }
}

impl Serialize for CalendarTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let epoch = self.year_anchor(self.first_year).map_err(S::Error::custom)?;
        TableFile {
            first_year: self.first_year,
            epoch,
            months: self.months.clone(),
        }
        .serialize(serializer)
    }
}

impl CalendarTable {
    /// Builds a table from the Gregorian date of `first_year`'s 1 Baisakh and
    /// one row of twelve month lengths per year.
    ///
    /// # Errors
    /// Returns `TableError` if `months` is empty, a month length is outside
    /// 29..=32, the years overflow `u16`, or the last year ends past the
    /// Gregorian range `chrono` supports.
    pub fn new(
        first_year: u16,
        epoch: NaiveDate,
        months: Vec<[u8; MONTHS_PER_YEAR]>,
    ) -> Result<Self, TableError> {
        if months.is_empty() {
            return Err(TableError::Empty);
        }
        let span = u16::try_from(months.len() - 1).map_err(|_| TableError::YearOverflow {
            first_year,
            count: months.len(),
        })?;
        let last_year = first_year.checked_add(span).ok_or(TableError::YearOverflow {
            first_year,
            count: months.len(),
        })?;

        for (year, row) in (first_year..=last_year).zip(&months) {
            if let Some((idx, &days)) =
                row.iter().enumerate().find(|&(_, days)| !(MIN_MONTH_DAYS..=MAX_MONTH_DAYS).contains(days))
            {
                return Err(TableError::MonthLength {
                    year,
                    month: idx as u8 + 1,
                    days,
                });
            }
        }

        let table = Self::assemble(first_year, epoch.num_days_from_ce(), months);
        let end = table.anchors[table.anchors.len() - 1];
        if NaiveDate::from_num_days_from_ce_opt(end).is_none() {
            return Err(TableError::DateOverflow { year: last_year });
        }
        Ok(table)
    }

    /// The table shipped with this crate.
    pub fn bundled() -> &'static Self {
        &BUNDLED
    }

    /// Computes the anchors of already-validated rows.
    fn assemble(first_year: u16, epoch_days: i32, months: Vec<[u8; MONTHS_PER_YEAR]>) -> Self {
        let mut anchors = Vec::with_capacity(months.len() + 1);
        let mut day = epoch_days;
        anchors.push(day);
        for row in &months {
            day += row.iter().map(|&len| i32::from(len)).sum::<i32>();
            anchors.push(day);
        }
        debug!(
            "built calendar table for BS {first_year}..={}",
            usize::from(first_year) + months.len() - 1
        );
        Self {
            first_year,
            months,
            anchors,
        }
    }

    /// First BS year covered
    pub const fn first_year(&self) -> u16 {
        self.first_year
    }

    /// Last BS year covered (inclusive)
    pub fn last_year(&self) -> u16 {
        // `new` guarantees this fits
        self.first_year + (self.months.len() - 1) as u16
    }

    /// Whether `year` has an entry in the table
    pub fn contains_year(&self, year: u16) -> bool {
        (self.first_year..=self.last_year()).contains(&year)
    }

    pub(crate) fn year_index(&self, year: u16) -> Result<usize, ConvertError> {
        if self.contains_year(year) {
            Ok(usize::from(year - self.first_year))
        } else {
            debug!(
                "BS {year} is outside the calendar table ({}..={})",
                self.first_year,
                self.last_year()
            );
            Err(ConvertError::UnsupportedYear {
                year: i32::from(year),
                calendar: Calendar::BikramSambat,
            })
        }
    }

    /// Days from CE of 1 Baisakh for the year at `idx`.
    pub(crate) fn anchor_days(&self, idx: usize) -> i32 {
        self.anchors[idx]
    }

    /// Index of the year whose span contains `days` (days from CE), if any.
    pub(crate) fn index_of_day(&self, days: i32) -> Option<usize> {
        let after = self.anchors.partition_point(|&anchor| anchor <= days);
        (after > 0 && after < self.anchors.len()).then(|| after - 1)
    }

    /// The twelve month lengths of `year`, Baisakh first.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table.
    pub fn month_lengths(&self, year: u16) -> Result<[u8; MONTHS_PER_YEAR], ConvertError> {
        Ok(self.months[self.year_index(year)?])
    }

    /// Gregorian date of 1 Baisakh of `year`.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table.
    pub fn year_anchor(&self, year: u16) -> Result<NaiveDate, ConvertError> {
        let idx = self.year_index(year)?;
        NaiveDate::from_num_days_from_ce_opt(self.anchors[idx]).ok_or(ConvertError::UnsupportedYear {
            year: i32::from(year),
            calendar: Calendar::BikramSambat,
        })
    }

    /// Number of days in `month` (1-indexed) of `year`.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` for a year outside the table and
    /// `ConvertError::InvalidBsDate` for a month outside 1..=12.
    pub fn days_in_month(&self, year: u16, month: u8) -> Result<u8, ConvertError> {
        let lengths = self.month_lengths(year)?;
        let month = Month::new(month).map_err(|_| ConvertError::InvalidBsDate {
            year,
            month,
            day: 1,
        })?;
        Ok(lengths[month.index()])
    }

    /// Number of days in `year`.
    ///
    /// # Errors
    /// Returns `ConvertError::UnsupportedYear` if the year is not in the table.
    pub fn days_in_year(&self, year: u16) -> Result<u16, ConvertError> {
        let lengths = self.month_lengths(year)?;
        Ok(lengths.iter().map(|&len| u16::from(len)).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    const ROW_365: [u8; 12] = [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30];

    #[test]
    fn test_bundled_epoch_constant() {
        assert_eq!(ymd(2003, 4, 14).num_days_from_ce(), data::EPOCH_DAYS_FROM_CE);
    }

    #[test]
    fn test_bundled_passes_validation() {
        let rebuilt =
            CalendarTable::new(data::FIRST_YEAR, ymd(2003, 4, 14), data::MONTH_LENGTHS.to_vec()).unwrap();
        assert_eq!(&rebuilt, CalendarTable::bundled());
    }

    #[test]
    fn test_bundled_range() {
        let table = CalendarTable::bundled();
        assert_eq!(table.first_year(), 2060);
        assert_eq!(table.last_year(), 2086);
        assert!(table.contains_year(2081));
        assert!(!table.contains_year(2059));
        assert!(!table.contains_year(2087));
    }

    #[test]
    fn test_bundled_new_year_anchors() {
        struct TestCase {
            bs_year: u16,
            gregorian: NaiveDate,
        }

        let cases = [
            TestCase {
                bs_year: 2060,
                gregorian: ymd(2003, 4, 14),
            },
            TestCase {
                bs_year: 2065,
                gregorian: ymd(2008, 4, 13),
            },
            TestCase {
                bs_year: 2070,
                gregorian: ymd(2013, 4, 14),
            },
            TestCase {
                bs_year: 2073,
                gregorian: ymd(2016, 4, 13),
            },
            TestCase {
                bs_year: 2077,
                gregorian: ymd(2020, 4, 13),
            },
            TestCase {
                bs_year: 2080,
                gregorian: ymd(2023, 4, 14),
            },
            TestCase {
                bs_year: 2081,
                gregorian: ymd(2024, 4, 13),
            },
            TestCase {
                bs_year: 2082,
                gregorian: ymd(2025, 4, 14),
            },
        ];

        let table = CalendarTable::bundled();
        for case in &cases {
            assert_eq!(
                table.year_anchor(case.bs_year).unwrap(),
                case.gregorian,
                "BS {} should begin on {}",
                case.bs_year,
                case.gregorian
            );
        }
    }

    #[test]
    fn test_anchors_are_contiguous() {
        let table = CalendarTable::bundled();
        for year in table.first_year()..table.last_year() {
            let anchor = table.year_anchor(year).unwrap();
            let next = table.year_anchor(year + 1).unwrap();
            let length = i64::from(table.days_in_year(year).unwrap());
            assert_eq!(
                next.signed_duration_since(anchor).num_days(),
                length,
                "BS {year} should end the day before BS {} begins",
                year + 1
            );
        }
    }

    #[test]
    fn test_bundled_month_lengths_in_range() {
        let table = CalendarTable::bundled();
        for year in table.first_year()..=table.last_year() {
            for month in 1..=12 {
                let days = table.days_in_month(year, month).unwrap();
                assert!(
                    (MIN_MONTH_DAYS..=MAX_MONTH_DAYS).contains(&days),
                    "BS {year}-{month:02} has {days} days"
                );
            }
            let total = table.days_in_year(year).unwrap();
            assert!((365..=366).contains(&total), "BS {year} has {total} days");
        }
    }

    #[test]
    fn test_unsupported_year() {
        let table = CalendarTable::bundled();
        let err = table.month_lengths(2000).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedYear {
                year: 2000,
                calendar: Calendar::BikramSambat
            }
        );
        assert!(table.year_anchor(2100).is_err());
        assert!(table.days_in_year(2059).is_err());
    }

    #[test]
    fn test_days_in_month_invalid_month() {
        let table = CalendarTable::bundled();
        assert!(matches!(
            table.days_in_month(2081, 13),
            Err(ConvertError::InvalidBsDate { month: 13, .. })
        ));
        assert!(matches!(
            table.days_in_month(2081, 0),
            Err(ConvertError::InvalidBsDate { month: 0, .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        let result = CalendarTable::new(2081, ymd(2024, 4, 13), vec![]);
        assert_eq!(result, Err(TableError::Empty));
    }

    #[test]
    fn test_new_rejects_bad_month_length() {
        let mut row = ROW_365;
        row[4] = 28;
        let result = CalendarTable::new(2080, ymd(2023, 4, 14), vec![ROW_365, row]);
        assert_eq!(
            result,
            Err(TableError::MonthLength {
                year: 2081,
                month: 5,
                days: 28
            })
        );

        row[4] = 33;
        let result = CalendarTable::new(2081, ymd(2024, 4, 13), vec![row]);
        assert!(matches!(result, Err(TableError::MonthLength { days: 33, .. })));
    }

    #[test]
    fn test_new_rejects_year_overflow() {
        let result = CalendarTable::new(u16::MAX, ymd(2024, 4, 13), vec![ROW_365, ROW_365]);
        assert!(matches!(result, Err(TableError::YearOverflow { count: 2, .. })));
    }

    #[test]
    fn test_new_rejects_date_overflow() {
        let result = CalendarTable::new(2081, NaiveDate::MAX, vec![ROW_365]);
        assert_eq!(result, Err(TableError::DateOverflow { year: 2081 }));
    }

    #[test]
    fn test_error_display() {
        let err = TableError::MonthLength {
            year: 2081,
            month: 5,
            days: 28,
        };
        assert_eq!(err.to_string(), "Month 5 of BS 2081 has 28 days (expected 29-32)");
    }

    #[test]
    fn test_serde_json_table() {
        let json = r#"{
            "first_year": 2080,
            "epoch": "2023-04-14",
            "months": [
                [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30],
                [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31]
            ]
        }"#;
        let table: CalendarTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.first_year(), 2080);
        assert_eq!(table.last_year(), 2081);
        assert_eq!(table.year_anchor(2081).unwrap(), ymd(2024, 4, 13));

        let out = serde_json::to_value(&table).unwrap();
        assert_eq!(out["epoch"], "2023-04-14");
        assert_eq!(out["first_year"], 2080);

        let reparsed: CalendarTable = serde_json::from_value(out).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_serde_json_rejects_invalid_table() {
        let json = r#"{"first_year": 2081, "epoch": "2024-04-13", "months": []}"#;
        let result: Result<CalendarTable, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"first_year": 2081, "epoch": "2024-04-13", "months": [[31, 32, 31]]}"#;
        let result: Result<CalendarTable, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
