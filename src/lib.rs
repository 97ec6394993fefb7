mod broker;
mod consts;
mod day;
mod indexer;
mod pager;
mod picker;
mod pool;
mod prelude;
mod range;
mod years;

pub use broker::{ObserverId, SelectionBroker, SelectionObserver};
pub use consts::*;
pub use day::{CalendarDay, Weekday, days_in_month};
pub use indexer::{month_at, page_of};
pub use pager::{OutOfRange, PagerController, PagerPhase};
pub use picker::{DatePicker, PickerError};
pub use pool::{MonthViewPool, MonthViewState, PageKey};
pub use range::{ConstraintError, DateRange};
pub use years::YearListController;

use crate::prelude::*;

/// Error type for date construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be {}-{})", "_0", JANUARY, DECEMBER)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {month} of year {year}")]
    InvalidDay { month: u8, day: u8, year: i32 },
    #[display(fmt = "Invalid weekday: {} (must be 1-{})", "_0", DAYS_IN_WEEK)]
    InvalidWeekday(u8),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}
