/// Earliest selectable year (legacy platform-calendar floor)
pub const MIN_PICKER_YEAR: i32 = 1902;

/// Latest selectable year (legacy platform-calendar ceiling)
pub const MAX_PICKER_YEAR: i32 = 2037;

/// Months per year; month indices run 0 to 11
pub const MONTHS_IN_YEAR: u8 = 12;

/// Month index for January
pub const JANUARY: u8 = 0;
/// Month index for February
pub const FEBRUARY: u8 = 1;
/// Month index for December, the highest valid month index
pub const DECEMBER: u8 = 11;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Days in February when the leap rule applies
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Days in each month, indexed by 0-based month
/// February shows 28 days (non-leap default, adjusted by the leap check)
pub const DAYS_IN_MONTH: [u8; 12] = [
    31, // January
    28, // February (non-leap)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Days preceding each month in a non-leap year, indexed by 0-based month
pub(crate) const DAYS_BEFORE_MONTH: [u16; 12] = [
    0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334,
];

/// The simplified leap rule: every fourth year, with no century exception
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;

/// Days per week
pub const DAYS_IN_WEEK: u8 = 7;

/// Unix epoch year, the anchor for linear day numbers
pub(crate) const EPOCH_YEAR: i32 = 1970;

/// Days from year 0 to 1970-01-01 under the fourth-year leap rule
pub(crate) const EPOCH_OFFSET_DAYS: i64 = 719_543;

/// 1970-01-01 was a Thursday; offset into a Sunday-first week
pub(crate) const EPOCH_WEEKDAY: i64 = 4;

pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

/// Pages kept materialized on each side of the current page
pub const OFFSCREEN_PAGE_LIMIT: usize = 1;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Range separator between the min and max dates
pub const RANGE_SEPARATOR: char = '/';
