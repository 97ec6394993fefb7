use crate::consts::{
    DATE_SEPARATOR, DAYS_BEFORE_MONTH, DAYS_IN_MONTH, DAYS_IN_WEEK, DECEMBER, EPOCH_OFFSET_DAYS,
    EPOCH_WEEKDAY, EPOCH_YEAR, FEBRUARY, FEBRUARY_DAYS_LEAP, JANUARY, LEAP_YEAR_CYCLE,
    MAX_PICKER_YEAR, MILLIS_PER_DAY, MIN_DAY, MIN_PICKER_YEAR, MONTHS_IN_YEAR,
};
use crate::prelude::*;
use crate::DateError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An immutable calendar date.
///
/// Months are 0-based (0 = January, 11 = December), matching the page
/// arithmetic throughout the crate. The day is validated against the
/// month length at construction, so every value is a real date.
///
/// Comparisons go through a linear day number rather than raw fields,
/// so they stay temporally exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Into)]
pub struct CalendarDay {
    year:  i32,
    month: u8,
    day:   u8,
}

impl CalendarDay {
    /// Creates a new date from explicit fields.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if `month` is outside `0..=11`,
    /// or `DateError::InvalidDay` if `day` is outside the month.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if month > DECEMBER {
            return Err(DateError::InvalidMonth(month));
        }
        if day < MIN_DAY || day > month_length(month, year) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Creates a date from a Unix timestamp in milliseconds.
    ///
    /// The timestamp is saturated to the supported window
    /// (1902-01-01 through 2037-12-31), so the result is always a date
    /// the picker can display.
    pub fn from_epoch_millis(millis: i64) -> Self {
        let floor = days_from_civil(MIN_PICKER_YEAR, JANUARY, MIN_DAY);
        let ceiling = days_from_civil(
            MAX_PICKER_YEAR,
            DECEMBER,
            DAYS_IN_MONTH[DECEMBER as usize],
        );
        let mut days = millis.div_euclid(MILLIS_PER_DAY).clamp(floor, ceiling);

        let mut year = EPOCH_YEAR;
        loop {
            if days < 0 {
                year -= 1;
                days += i64::from(days_in_year(year));
            } else {
                let len = i64::from(days_in_year(year));
                if days < len {
                    break;
                }
                days -= len;
                year += 1;
            }
        }
        let mut month = JANUARY;
        loop {
            let len = i64::from(month_length(month, year));
            if days < len {
                break;
            }
            days -= len;
            month += 1;
        }
        Self {
            year,
            month,
            day: days as u8 + 1,
        }
    }

    /// Builds a date from fields the caller has already validated.
    pub(crate) const fn from_parts(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns the year
    #[inline]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the 0-based month (0 = January)
    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the 1-based day of month
    #[inline]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// True if this date falls strictly before `other` in time.
    pub fn is_before(&self, other: &Self) -> bool {
        self.day_number() < other.day_number()
    }

    /// True if this date falls strictly after `other` in time.
    pub fn is_after(&self, other: &Self) -> bool {
        self.day_number() > other.day_number()
    }

    /// Day of the week this date falls on.
    pub fn weekday(&self) -> Weekday {
        match (self.day_number() + EPOCH_WEEKDAY).rem_euclid(i64::from(DAYS_IN_WEEK)) {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    /// Days since 1970-01-01 under the fourth-year leap rule.
    fn day_number(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // months are 1-based on the wire
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }
}

impl FromStr for CalendarDay {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DateError::InvalidFormat(format!(
                "Expected year{DATE_SEPARATOR}month{DATE_SEPARATOR}day, found {} field(s): {trimmed}",
                parts.len()
            )));
        }

        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| DateError::InvalidFormat(parts[0].to_owned()))?;
        let wire_month = parts[1]
            .parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(parts[1].to_owned()))?;
        let day = parts[2]
            .parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(parts[2].to_owned()))?;

        if wire_month < 1 || wire_month > MONTHS_IN_YEAR {
            return Err(DateError::InvalidFormat(format!(
                "Month {wire_month} out of range 1-{MONTHS_IN_YEAR}"
            )));
        }

        Self::new(year, wire_month - 1, day)
    }
}

impl PartialOrd for CalendarDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDay {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare positions on the timeline first…
        match self.day_number().cmp(&other.day_number()) {
            Ordering::Equal => {
                // …then break ties on raw fields to stay consistent with Eq.
                (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
            }
            ord => ord,
        }
    }
}

impl serde::Serialize for CalendarDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A day of the week, carried with the calendar-convention index
/// (1 = Sunday through 7 = Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    /// Returns the 1-based index (1 = Sunday through 7 = Saturday)
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Weekday {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sunday),
            2 => Ok(Self::Monday),
            3 => Ok(Self::Tuesday),
            4 => Ok(Self::Wednesday),
            5 => Ok(Self::Thursday),
            6 => Ok(Self::Friday),
            7 => Ok(Self::Saturday),
            _ => Err(DateError::InvalidWeekday(value)),
        }
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday as Self
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        write!(f, "{name}")
    }
}

// Helper functions

/// Number of days in a 0-based month.
///
/// February has 29 days whenever the year is divisible by 4. The rule
/// deliberately skips the Gregorian century exception; within the
/// supported 1902-2037 window the two agree.
///
/// # Errors
/// Returns `DateError::InvalidMonth` for month values outside `0..=11`.
pub fn days_in_month(month: u8, year: i32) -> Result<u8, DateError> {
    if month > DECEMBER {
        return Err(DateError::InvalidMonth(month));
    }
    Ok(month_length(month, year))
}

pub(crate) const fn month_length(month: u8, year: i32) -> u8 {
    debug_assert!(month <= DECEMBER);

    if month == FEBRUARY && year % LEAP_YEAR_CYCLE == 0 {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

const fn days_in_year(year: i32) -> u16 {
    if year % LEAP_YEAR_CYCLE == 0 { 366 } else { 365 }
}

/// Days since 1970-01-01 for the given fields, under the fourth-year
/// leap rule. Total over all field values, including day values past
/// the month length, which spill into the following month.
fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = i64::from(year);
    let to_year = y * 365 + (y + 3).div_euclid(4) - EPOCH_OFFSET_DAYS;
    let mut day_of_year = i64::from(DAYS_BEFORE_MONTH[month as usize]);
    if month > FEBRUARY && year % LEAP_YEAR_CYCLE == 0 {
        day_of_year += 1;
    }
    to_year + day_of_year + i64::from(day) - 1
}
