use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::day::month_length;
use crate::indexer::page_of;
use crate::{
    CalendarDay, DAYS_IN_MONTH, DECEMBER, DateError, JANUARY, MAX_PICKER_YEAR, MIN_DAY,
    MIN_PICKER_YEAR, RANGE_SEPARATOR, prelude::*,
};

/// The selectable window between a minimum and a maximum date (inclusive).
/// The minimum must be less than or equal to the maximum, and both must
/// fall inside the supported picker years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{min}/{max}")]
pub struct DateRange {
    min: CalendarDay,
    max: CalendarDay,
}

/// Error type for date constraint operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    /// Minimum date is after maximum date.
    #[error("Invalid constraints: min ({min}) is after max ({max})")]
    StartAfterEnd { min: CalendarDay, max: CalendarDay },

    /// Minimum date falls before the earliest supported year.
    #[error("Min date year {0} is below the supported floor {floor}", floor = MIN_PICKER_YEAR)]
    BelowAbsoluteMin(i32),

    /// Maximum date falls after the latest supported year.
    #[error("Max date year {0} is above the supported ceiling {ceiling}", ceiling = MAX_PICKER_YEAR)]
    AboveAbsoluteMax(i32),

    /// Error parsing a bound.
    #[error(transparent)]
    DateError(#[from] DateError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new range with validation.
    ///
    /// # Errors
    /// Returns `ConstraintError::StartAfterEnd` if min > max, or
    /// `ConstraintError::BelowAbsoluteMin`/`AboveAbsoluteMax` if a bound
    /// lies outside the supported picker years.
    pub fn new(min: CalendarDay, max: CalendarDay) -> Result<Self, ConstraintError> {
        if min.is_after(&max) {
            return Err(ConstraintError::StartAfterEnd { min, max });
        }
        if min.year() < MIN_PICKER_YEAR {
            return Err(ConstraintError::BelowAbsoluteMin(min.year()));
        }
        if max.year() > MAX_PICKER_YEAR {
            return Err(ConstraintError::AboveAbsoluteMax(max.year()));
        }
        Ok(Self { min, max })
    }

    /// Returns the earliest selectable date
    pub const fn min(&self) -> CalendarDay {
        self.min
    }

    /// Returns the latest selectable date
    pub const fn max(&self) -> CalendarDay {
        self.max
    }

    /// Returns both bounds as a tuple
    pub const fn bounds(&self) -> (CalendarDay, CalendarDay) {
        (self.min, self.max)
    }

    /// Number of month pages needed to show every selectable date.
    /// A range confined to one month still counts a single page.
    pub fn month_count(&self) -> usize {
        // max >= min by construction, so the last page index is non-negative
        (page_of(self.max, self) + 1) as usize
    }

    /// Checks if the range contains a given date (both bounds inclusive).
    pub fn contains(&self, date: &CalendarDay) -> bool {
        !date.is_before(&self.min) && !date.is_after(&self.max)
    }

    /// Pulls candidate date fields into the range and returns the nearest
    /// selectable date.
    ///
    /// Day overflow is resolved against the candidate month before the
    /// bounds apply, so a Feb 29 selection carried into a common year
    /// lands on Feb 28 instead of spilling into March. The result is
    /// always a valid date inside the range, and re-clamping it is a
    /// no-op.
    pub fn clamp(&self, year: i32, month: u8, day: u8) -> CalendarDay {
        let year = year.clamp(self.min.year(), self.max.year());
        let mut month = month.min(DECEMBER);
        let mut day = day.clamp(MIN_DAY, month_length(month, year));

        // Settle the month against both edges before the day checks run:
        // lowering the month to the max edge can land on the min month
        // too (a range confined to one month), and the day must then
        // honor both bounds.
        if year == self.min.year() && month < self.min.month() {
            month = self.min.month();
        }
        if year == self.max.year() && month > self.max.month() {
            month = self.max.month();
        }
        if year == self.min.year() && month == self.min.month() && day < self.min.day() {
            day = self.min.day();
        }
        if year == self.max.year() && month == self.max.month() && day > self.max.day() {
            day = self.max.day();
        }

        // Raising the month can leave the day past the new month's end
        let day = day.min(month_length(month, year));
        CalendarDay::from_parts(year, month, day)
    }
}

/// The widest allowed range, spanning every supported picker year.
impl Default for DateRange {
    fn default() -> Self {
        Self {
            min: CalendarDay::from_parts(MIN_PICKER_YEAR, JANUARY, MIN_DAY),
            max: CalendarDay::from_parts(
                MAX_PICKER_YEAR,
                DECEMBER,
                DAYS_IN_MONTH[DECEMBER as usize],
            ),
        }
    }
}

impl FromStr for DateRange {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(ConstraintError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                // SAFETY: We just verified separator_count == 1, so find() must succeed
                let pos = trimmed.find(RANGE_SEPARATOR).ok_or_else(|| {
                    ConstraintError::InvalidFormat(format!(
                        "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                    ))
                })?;
                let min_str = trimmed[..pos].trim();
                let max_str = trimmed[pos + 1..].trim();

                let min = min_str.parse::<CalendarDay>()?;
                let max = max_str.parse::<CalendarDay>()?;

                Self::new(min, max)
            },
            _ => Err(ConstraintError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
