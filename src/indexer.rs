//! Pure mapping between linear page positions and calendar months.
//!
//! A range of selectable dates is rendered as a strip of month pages.
//! Page 0 is the month containing the range minimum and the last page
//! is the month containing the maximum; these two functions convert
//! between the two coordinate systems.

use crate::range::DateRange;
use crate::{CalendarDay, MONTHS_IN_YEAR};

/// Zero-based page position of `date`'s month within `range`.
///
/// Only the year and month take part; the day of month never moves a
/// date to a different page. Dates in months before the range minimum
/// map to negative values, so callers check membership before treating
/// the result as an index.
pub fn page_of(date: CalendarDay, range: &DateRange) -> i32 {
    let months = i32::from(MONTHS_IN_YEAR);
    (date.year() - range.min().year()) * months + i32::from(date.month())
        - i32::from(range.min().month())
}

/// Year and 0-based month shown `position` pages past the range start.
pub fn month_at(position: usize, range: &DateRange) -> (i32, u8) {
    let months = usize::from(MONTHS_IN_YEAR);
    let shifted = position + usize::from(range.min().month());
    let year = range.min().year() + (shifted / months) as i32;
    let month = (shifted % months) as u8;
    (year, month)
}
