use std::rc::Rc;

use crate::broker::SelectionBroker;
use crate::day::month_length;
use crate::pager::{OutOfRange, PagerController};
use crate::range::DateRange;
use crate::CalendarDay;

/// Backs the year-list half of the picker.
///
/// Holds the selectable year sequence derived from the range endpoints
/// and a shared broker handle for reading the selection. The pager is
/// not stored; the coordinator passes it into [`Self::select_year`].
#[derive(Debug)]
pub struct YearListController {
    range:    DateRange,
    years:    Vec<i32>,
    revision: u64,
    broker:   Rc<SelectionBroker>,
}

impl YearListController {
    /// Creates the controller with the sequence spanning the endpoint
    /// years of `range`, inclusive.
    pub fn new(range: DateRange, broker: Rc<SelectionBroker>) -> Self {
        let years = (range.min().year()..=range.max().year()).collect();
        Self {
            range,
            years,
            revision: 0,
            broker,
        }
    }

    /// The selectable years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Whether `year` is the committed selection's year.
    pub fn is_selected(&self, year: i32) -> bool {
        self.broker.selected().year() == year
    }

    /// Index of the selection's year inside the sequence, `None` while
    /// the selection sits outside it.
    pub fn selected_index(&self) -> Option<usize> {
        let year = self.broker.selected().year();
        self.years.binary_search(&year).ok()
    }

    /// Commits a year chosen from the list.
    ///
    /// The selected day is carried into the chosen year, pulled back to
    /// that month's end when shorter, then clamped into the range. The
    /// pager jumps to the result before the commit, so observers fire
    /// with the window already on the new page.
    ///
    /// # Errors
    /// Returns `OutOfRange` when `year` is not part of the sequence;
    /// nothing moves and nothing is committed.
    pub fn select_year(
        &self,
        year: i32,
        pager: &mut PagerController,
    ) -> Result<CalendarDay, OutOfRange> {
        let selected = self.broker.selected();
        if year < self.range.min().year() || year > self.range.max().year() {
            let day = selected.day().min(month_length(selected.month(), year));
            return Err(OutOfRange {
                date: CalendarDay::from_parts(year, selected.month(), day),
                min: self.range.min(),
                max: self.range.max(),
            });
        }
        let target = self.range.clamp(year, selected.month(), selected.day());
        pager.jump_to(target)?;
        pager.apply_selection(target);
        Ok(target)
    }

    /// Adopts `new_range`, regenerating the sequence only when the
    /// endpoint years moved.
    ///
    /// Returns true when the sequence was regenerated; the revision
    /// counter moves with it so list hosts can drop cached rows.
    pub fn on_range_changed(&mut self, new_range: DateRange) -> bool {
        let endpoints_moved = new_range.min().year() != self.range.min().year()
            || new_range.max().year() != self.range.max().year();
        self.range = new_range;
        if endpoints_moved {
            self.years = (new_range.min().year()..=new_range.max().year()).collect();
            self.revision += 1;
        }
        endpoints_moved
    }

    /// Sequence revision; bumps each time the year list regenerates.
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}
