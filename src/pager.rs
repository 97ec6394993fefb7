use std::ops::RangeInclusive;
use std::rc::Rc;

use log::{debug, info};

use crate::broker::SelectionBroker;
use crate::indexer::{month_at, page_of};
use crate::pool::{MonthViewPool, MonthViewState, PageKey};
use crate::range::DateRange;
use crate::{CalendarDay, DateError, MIN_DAY, OFFSCREEN_PAGE_LIMIT, Weekday};

/// Where the pager sits in its page transition cycle.
///
/// Every public operation completes atomically, so callers only ever
/// observe `Idle`; `Transitioning` exists while a window rebuild is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    Idle,
    Transitioning,
}

/// A date refused because it falls outside the current range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Date {date} is outside the selectable range {min}/{max}")]
pub struct OutOfRange {
    pub date: CalendarDay,
    pub min:  CalendarDay,
    pub max:  CalendarDay,
}

/// Drives the strip of month pages.
///
/// Owns the recycling pool and the current position; the committed
/// selection flows through the shared broker. The visible window is
/// the current page plus one materialized neighbor per side, truncated
/// at the strip ends.
#[derive(Debug)]
pub struct PagerController {
    range:      DateRange,
    week_start: Weekday,
    today:      Option<CalendarDay>,
    pool:       MonthViewPool,
    position:   usize,
    phase:      PagerPhase,
    broker:     Rc<SelectionBroker>,
}

impl PagerController {
    /// Creates a pager over `range` with the window materialized around
    /// page 0.
    pub fn new(range: DateRange, week_start: Weekday, broker: Rc<SelectionBroker>) -> Self {
        let mut pager = Self {
            range,
            week_start,
            today: None,
            pool: MonthViewPool::new(),
            position: 0,
            phase: PagerPhase::Idle,
            broker,
        };
        pager.rebuild_window(0);
        pager
    }

    /// Moves the visible window to the page holding `date`.
    ///
    /// This is the only position-changing transition. The target must
    /// lie inside the current range; the pager never clamps on its
    /// own, so a rejected jump leaves every page untouched.
    ///
    /// # Errors
    /// Returns `OutOfRange` carrying the date and both bounds when
    /// `date` falls outside the range.
    pub fn jump_to(&mut self, date: CalendarDay) -> Result<usize, OutOfRange> {
        if !self.range.contains(&date) {
            return Err(OutOfRange {
                date,
                min: self.range.min(),
                max: self.range.max(),
            });
        }
        // containment makes the position non-negative
        let position = page_of(date, &self.range) as usize;
        if position != self.position {
            self.rebuild_window(position);
        }
        Ok(position)
    }

    /// Steps back one month. Returns false at the start of the strip.
    pub fn navigate_prior(&mut self) -> bool {
        if !self.can_navigate_prior() {
            return false;
        }
        let (year, month) = month_at(self.position - 1, &self.range);
        self.jump_to(self.range.clamp(year, month, MIN_DAY)).is_ok()
    }

    /// Steps forward one month. Returns false at the end of the strip.
    pub fn navigate_next(&mut self) -> bool {
        if !self.can_navigate_next() {
            return false;
        }
        let (year, month) = month_at(self.position + 1, &self.range);
        self.jump_to(self.range.clamp(year, month, MIN_DAY)).is_ok()
    }

    /// Mirror of the back-chevron enabled state.
    pub fn can_navigate_prior(&self) -> bool {
        self.month_count() > 1 && self.position != 0
    }

    /// Mirror of the forward-chevron enabled state.
    pub fn can_navigate_next(&self) -> bool {
        self.month_count() > 1 && self.position != self.month_count() - 1
    }

    /// Reports a tapped day cell.
    ///
    /// Malformed fields are a bug in the calling layer and surface as
    /// `DateError`. A well-formed date outside the range is an expected
    /// interaction with a disabled cell: it is dropped with an info log
    /// and `Ok(None)`. An in-range day becomes the selection — the
    /// tapped page keeps the mark, every other live page loses theirs,
    /// and the day is committed to the broker.
    ///
    /// # Errors
    /// Returns `DateError` when the fields do not form a real date.
    pub fn on_day_tapped(
        &mut self,
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<Option<CalendarDay>, DateError> {
        let candidate = CalendarDay::new(year, month, day)?;
        if !self.range.contains(&candidate) {
            info!(
                "Ignoring tap on {}: outside the selectable range {}",
                candidate, self.range
            );
            return Ok(None);
        }
        self.apply_selection(candidate);
        Ok(Some(candidate))
    }

    /// Marks `day` selected on its page, clears marks elsewhere, and
    /// commits it to the broker. Callers validate range membership
    /// first.
    pub(crate) fn apply_selection(&mut self, day: CalendarDay) {
        if let Some(entry) = self.pool.lookup_mut(PageKey::from(day)) {
            entry.set_selected_day(Some(day.day()));
        }
        self.pool.invalidate_others(&day);
        self.broker.commit(day);
    }

    /// Replaces the date constraints.
    ///
    /// Page identities derive from the range origin, so every stale
    /// page is released and the window is rebuilt at the old position
    /// clamped into the new month count. The selection is left alone:
    /// pushing an orphaned selection back inside the range is the
    /// host's contract, via clamp, `jump_to` and a commit.
    pub fn on_range_changed(&mut self, new_range: DateRange) {
        self.range = new_range;
        let position = self.position.min(self.month_count() - 1);
        debug!(
            "Range replaced by {}: {} pages, window rebuilt at {}",
            new_range,
            self.month_count(),
            position
        );
        self.rebuild_window(position);
    }

    /// Changes the first day of the rendered week and rebinds the
    /// window.
    pub fn set_week_start(&mut self, week_start: Weekday) {
        self.week_start = week_start;
        self.rebuild_window(self.position);
    }

    /// Injects (or clears) the host's notion of today and rebinds the
    /// window.
    pub fn set_today(&mut self, today: Option<CalendarDay>) {
        self.today = today;
        self.rebuild_window(self.position);
    }

    /// Number of materialized pages.
    pub fn visible_page_count(&self) -> usize {
        self.pool.live_count()
    }

    /// The page the strip is showing.
    pub const fn current_position(&self) -> usize {
        self.position
    }

    /// Total pages across the range.
    pub fn month_count(&self) -> usize {
        self.range.month_count()
    }

    /// The materialized entry at `position`, when it lies inside the
    /// visible window.
    pub fn page_at(&self, position: usize) -> Option<&MonthViewState> {
        let (year, month) = month_at(position, &self.range);
        self.pool.lookup(PageKey::new(month, year))
    }

    /// Positions currently materialized.
    pub fn visible_positions(&self) -> RangeInclusive<usize> {
        self.window_positions(self.position)
    }

    /// The active constraints.
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// First day of the rendered week.
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The host-injected today mark.
    pub const fn today(&self) -> Option<CalendarDay> {
        self.today
    }

    /// Transition phase; `Idle` between operations.
    pub const fn phase(&self) -> PagerPhase {
        self.phase
    }

    /// Releases pages that left the window around `position` and binds
    /// the pages inside it, pulling the selection mark from the broker.
    fn rebuild_window(&mut self, position: usize) {
        self.phase = PagerPhase::Transitioning;

        let wanted: Vec<PageKey> = self
            .window_positions(position)
            .map(|p| {
                let (year, month) = month_at(p, &self.range);
                PageKey::new(month, year)
            })
            .collect();

        let stale: Vec<PageKey> = self
            .pool
            .live_keys()
            .filter(|key| !wanted.contains(key))
            .collect();
        for key in stale {
            self.pool.release(key);
        }

        let selected = self.broker.selected();
        for key in wanted {
            let on_page = selected.year() == key.year() && selected.month() == key.month();
            let entry = self.pool.acquire(key);
            entry.bind(
                on_page.then_some(selected.day()),
                self.week_start,
                &self.range,
                self.today,
            );
        }

        self.position = position;
        self.phase = PagerPhase::Idle;
    }

    /// Positions inside the visible window around `position`.
    fn window_positions(&self, position: usize) -> RangeInclusive<usize> {
        let first = position.saturating_sub(OFFSCREEN_PAGE_LIMIT);
        let last = (position + OFFSCREEN_PAGE_LIMIT).min(self.month_count() - 1);
        first..=last
    }
}
