/// Number of months in a Bikram Sambat year
pub const MONTHS_PER_YEAR: usize = 12;

/// Maximum valid month (Chaitra)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Shortest month observed in the published calendar
pub const MIN_MONTH_DAYS: u8 = 29;
/// Longest month observed in the published calendar
pub const MAX_MONTH_DAYS: u8 = 32;

/// Month number for Baisakh, the first month of the year
pub const BAISAKH: u8 = 1;
/// Month number for Chaitra, the last month of the year
pub const CHAITRA: u8 = 12;

/// Days in a week
pub const DAYS_PER_WEEK: usize = 7;

/// Date component separator (`YYYY-MM-DD`)
pub const DATE_SEPARATOR: char = '-';
