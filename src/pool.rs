use std::collections::HashMap;

use crate::day::month_length;
use crate::range::DateRange;
use crate::{CalendarDay, DAYS_IN_WEEK, MIN_DAY, Weekday, prelude::*};

/// Identity of a month page: which month of which year it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{month}.{year}")]
pub struct PageKey {
    month: u8,
    year:  i32,
}

impl PageKey {
    /// Creates a key from a 0-based month and a year.
    pub const fn new(month: u8, year: i32) -> Self {
        Self { month, year }
    }

    /// Returns the 0-based month
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the year
    pub const fn year(self) -> i32 {
        self.year
    }
}

impl From<CalendarDay> for PageKey {
    fn from(day: CalendarDay) -> Self {
        Self {
            month: day.month(),
            year:  day.year(),
        }
    }
}

/// Everything a month page needs to draw its grid: identity, bounds,
/// selection and today marks, and the derived cell layout.
///
/// Entries are recycled through [`MonthViewPool`] rather than
/// reconstructed, so all display parameters are (re)assigned through
/// [`bind`](Self::bind).
#[derive(Debug, Clone)]
pub struct MonthViewState {
    year:          i32,
    month:         u8,
    selected_day:  Option<u8>,
    week_start:    Weekday,
    min:           CalendarDay,
    max:           CalendarDay,
    today:         Option<u8>,
    cell_count:    u8,
    first_weekday: Weekday,
}

impl MonthViewState {
    fn empty() -> Self {
        let bounds = DateRange::default();
        Self {
            year:          bounds.min().year(),
            month:         bounds.min().month(),
            selected_day:  None,
            week_start:    Weekday::Sunday,
            min:           bounds.min(),
            max:           bounds.max(),
            today:         None,
            cell_count:    0,
            first_weekday: Weekday::Sunday,
        }
    }

    fn assign(&mut self, key: PageKey) {
        self.year = key.year();
        self.month = key.month();
    }

    /// Clears per-binding marks so a recycled entry starts blank.
    fn reset(&mut self) {
        self.selected_day = None;
        self.today = None;
        self.cell_count = 0;
    }

    /// Binds the display parameters for this entry's month.
    ///
    /// `today` is compared against the bound month and kept as a day of
    /// month only when it falls inside it.
    pub fn bind(
        &mut self,
        selected_day: Option<u8>,
        week_start: Weekday,
        range: &DateRange,
        today: Option<CalendarDay>,
    ) {
        self.selected_day = selected_day;
        self.week_start = week_start;
        self.min = range.min();
        self.max = range.max();
        self.today = today
            .filter(|day| day.year() == self.year && day.month() == self.month)
            .map(CalendarDay::day);
        self.cell_count = month_length(self.month, self.year);
        self.first_weekday = CalendarDay::from_parts(self.year, self.month, MIN_DAY).weekday();
    }

    /// Sets or clears the selection mark.
    pub fn set_selected_day(&mut self, day: Option<u8>) {
        self.selected_day = day;
    }

    /// Clears any selection mark.
    pub fn clear_selection(&mut self) {
        self.selected_day = None;
    }

    /// True when a rendered day cell falls outside the selectable bounds.
    pub fn is_day_disabled(&self, day: u8) -> bool {
        let date = CalendarDay::from_parts(self.year, self.month, day);
        self.min.is_after(&date) || self.max.is_before(&date)
    }

    /// Number of leading blank cells before day 1 in the grid.
    pub fn day_offset(&self) -> u8 {
        let first = self.first_weekday.index();
        let start = self.week_start.index();
        let shifted = if first < start {
            first + DAYS_IN_WEEK
        } else {
            first
        };
        shifted - start
    }

    /// Number of grid rows needed for the offset plus every day cell.
    pub fn row_count(&self) -> u8 {
        let cells = self.day_offset() + self.cell_count;
        cells / DAYS_IN_WEEK + u8::from(cells % DAYS_IN_WEEK > 0)
    }

    /// Returns the year
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the 0-based month
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns this entry's page identity
    pub const fn key(&self) -> PageKey {
        PageKey::new(self.month, self.year)
    }

    /// Selection mark as a day of month, if this page holds it
    pub const fn selected_day(&self) -> Option<u8> {
        self.selected_day
    }

    /// First day of the rendered week
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Number of day cells in the bound month
    pub const fn cell_count(&self) -> u8 {
        self.cell_count
    }

    /// Weekday the bound month starts on
    pub const fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Today mark as a day of month, if today falls in the bound month
    pub const fn today(&self) -> Option<u8> {
        self.today
    }
}

/// Recycling pool of month page entries.
///
/// Entries live in a stable arena; a live map points page identities at
/// arena slots, and released slots queue on a free list for reuse.
/// Paging steadily through months therefore allocates only the handful
/// of entries a visible window needs.
#[derive(Debug, Default)]
pub struct MonthViewPool {
    entries: Vec<MonthViewState>,
    live:    HashMap<PageKey, usize>,
    free:    Vec<usize>,
}

impl MonthViewPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, reusing a released slot when one is
    /// queued and growing the arena otherwise. A key that is already
    /// live hands back its existing entry untouched.
    pub fn acquire(&mut self, key: PageKey) -> &mut MonthViewState {
        if let Some(&slot) = self.live.get(&key) {
            return &mut self.entries[slot];
        }
        let slot = match self.free.pop() {
            Some(slot) => {
                self.entries[slot].reset();
                slot
            },
            None => {
                self.entries.push(MonthViewState::empty());
                self.entries.len() - 1
            },
        };
        self.entries[slot].assign(key);
        self.live.insert(key, slot);
        &mut self.entries[slot]
    }

    /// Releases the entry for `key` back onto the free list.
    /// Returns false when the key was not live.
    pub fn release(&mut self, key: PageKey) -> bool {
        match self.live.remove(&key) {
            Some(slot) => {
                self.free.push(slot);
                true
            },
            None => false,
        }
    }

    /// Read access to a live entry.
    pub fn lookup(&self, key: PageKey) -> Option<&MonthViewState> {
        let slot = *self.live.get(&key)?;
        Some(&self.entries[slot])
    }

    /// Write access to a live entry.
    pub fn lookup_mut(&mut self, key: PageKey) -> Option<&mut MonthViewState> {
        let slot = *self.live.get(&key)?;
        Some(&mut self.entries[slot])
    }

    /// Clears the selection mark on every live entry except the page
    /// holding `selected`.
    pub fn invalidate_others(&mut self, selected: &CalendarDay) {
        let keep = PageKey::from(*selected);
        for (&key, &slot) in &self.live {
            if key != keep {
                self.entries[slot].clear_selection();
            }
        }
    }

    /// Number of live entries.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total entries the arena has grown to, live and free together.
    pub fn allocated_count(&self) -> usize {
        self.entries.len()
    }

    /// Identities of the live entries, in no particular order.
    pub fn live_keys(&self) -> impl Iterator<Item = PageKey> + '_ {
        self.live.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cal, range};

    fn wide_range() -> DateRange {
        range(2019, 0, 1, 2021, 11, 31)
    }

    #[test]
    fn test_acquire_grows_and_assigns_identity() {
        let mut pool = MonthViewPool::new();

        let entry = pool.acquire(PageKey::new(5, 2020));
        assert_eq!(entry.month(), 5);
        assert_eq!(entry.year(), 2020);
        assert_eq!(entry.key(), PageKey::new(5, 2020));

        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.allocated_count(), 1);

        pool.acquire(PageKey::new(6, 2020));
        assert_eq!(pool.live_count(), 2);
        assert_eq!(pool.allocated_count(), 2);
    }

    #[test]
    fn test_acquire_live_key_returns_existing_entry() {
        let mut pool = MonthViewPool::new();

        let entry = pool.acquire(PageKey::new(5, 2020));
        entry.set_selected_day(Some(17));

        let entry = pool.acquire(PageKey::new(5, 2020));
        assert_eq!(entry.selected_day(), Some(17));
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.allocated_count(), 1);
    }

    #[test]
    fn test_release_and_recycle() {
        let mut pool = MonthViewPool::new();

        pool.acquire(PageKey::new(5, 2020));
        assert!(pool.release(PageKey::new(5, 2020)));
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.allocated_count(), 1);

        let entry = pool.acquire(PageKey::new(9, 2021));
        assert_eq!(entry.key(), PageKey::new(9, 2021));
        assert_eq!(pool.live_count(), 1);
        // the released slot was reused, not grown past
        assert_eq!(pool.allocated_count(), 1);
        assert!(pool.lookup(PageKey::new(5, 2020)).is_none());
    }

    #[test]
    fn test_release_unknown_key() {
        let mut pool = MonthViewPool::new();
        assert!(!pool.release(PageKey::new(0, 2020)));
    }

    #[test]
    fn test_recycled_entry_starts_blank() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();

        let entry = pool.acquire(PageKey::new(5, 2020));
        entry.bind(
            Some(17),
            Weekday::Sunday,
            &bounds,
            Some(cal(2020, 5, 17)),
        );
        assert_eq!(entry.selected_day(), Some(17));
        assert_eq!(entry.today(), Some(17));

        pool.release(PageKey::new(5, 2020));
        let entry = pool.acquire(PageKey::new(9, 2021));
        assert_eq!(entry.selected_day(), None);
        assert_eq!(entry.today(), None);
        assert_eq!(entry.cell_count(), 0);
    }

    #[test]
    fn test_invalidate_others_keeps_selected_page() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();

        for month in 4..=6 {
            let entry = pool.acquire(PageKey::new(month, 2020));
            entry.bind(Some(10), Weekday::Sunday, &bounds, None);
        }

        pool.invalidate_others(&cal(2020, 5, 10));

        let kept = pool
            .lookup(PageKey::new(5, 2020))
            .expect("selected page must stay live");
        assert_eq!(kept.selected_day(), Some(10));

        for month in [4, 6] {
            let cleared = pool
                .lookup(PageKey::new(month, 2020))
                .expect("neighbor page must stay live");
            assert_eq!(
                cleared.selected_day(),
                None,
                "page {month}.2020 should have lost its mark"
            );
        }
    }

    #[test]
    fn test_lookup_and_lookup_mut() {
        let mut pool = MonthViewPool::new();

        assert!(pool.lookup(PageKey::new(5, 2020)).is_none());
        pool.acquire(PageKey::new(5, 2020));

        let entry = pool
            .lookup_mut(PageKey::new(5, 2020))
            .expect("acquired key must be live");
        entry.set_selected_day(Some(3));

        let entry = pool
            .lookup(PageKey::new(5, 2020))
            .expect("acquired key must be live");
        assert_eq!(entry.selected_day(), Some(3));
    }

    #[test]
    fn test_bind_computes_grid_for_june_2020() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();

        // June 1, 2020 was a Monday
        let entry = pool.acquire(PageKey::new(5, 2020));
        entry.bind(None, Weekday::Sunday, &bounds, None);

        assert_eq!(entry.cell_count(), 30);
        assert_eq!(entry.first_weekday(), Weekday::Monday);
        assert_eq!(entry.day_offset(), 1);
        assert_eq!(entry.row_count(), 5);
    }

    #[test]
    fn test_day_offset_with_monday_week_start() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();

        // February 1, 2021 was a Monday: a Monday-start grid packs it
        // into exactly four rows
        let entry = pool.acquire(PageKey::new(1, 2021));
        entry.bind(None, Weekday::Monday, &bounds, None);
        assert_eq!(entry.day_offset(), 0);
        assert_eq!(entry.cell_count(), 28);
        assert_eq!(entry.row_count(), 4);
    }

    #[test]
    fn test_day_offset_wraps_around_the_week() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();

        // March 1, 2020 was a Sunday; with a Monday week start the first
        // row carries six blanks and the month spills into six rows
        let entry = pool.acquire(PageKey::new(2, 2020));
        entry.bind(None, Weekday::Monday, &bounds, None);
        assert_eq!(entry.first_weekday(), Weekday::Sunday);
        assert_eq!(entry.day_offset(), 6);
        assert_eq!(entry.row_count(), 6);
    }

    #[test]
    fn test_is_day_disabled_respects_bounds() {
        let mut pool = MonthViewPool::new();
        let bounds = range(2020, 5, 15, 2020, 5, 20);

        let entry = pool.acquire(PageKey::new(5, 2020));
        entry.bind(None, Weekday::Sunday, &bounds, None);

        assert!(entry.is_day_disabled(14));
        assert!(!entry.is_day_disabled(15));
        assert!(!entry.is_day_disabled(17));
        assert!(!entry.is_day_disabled(20));
        assert!(entry.is_day_disabled(21));
    }

    #[test]
    fn test_today_only_marks_its_month() {
        let mut pool = MonthViewPool::new();
        let bounds = wide_range();
        let today = cal(2020, 5, 17);

        let entry = pool.acquire(PageKey::new(5, 2020));
        entry.bind(None, Weekday::Sunday, &bounds, Some(today));
        assert_eq!(entry.today(), Some(17));

        let entry = pool.acquire(PageKey::new(6, 2020));
        entry.bind(None, Weekday::Sunday, &bounds, Some(today));
        assert_eq!(entry.today(), None);
    }

    #[test]
    fn test_page_key_display() {
        assert_eq!(PageKey::new(5, 2020).to_string(), "5.2020");
    }

    #[test]
    fn test_page_key_from_day() {
        let key = PageKey::from(cal(2020, 5, 17));
        assert_eq!(key, PageKey::new(5, 2020));
    }

    #[test]
    fn test_page_key_identity_is_componentwise() {
        // digit-shuffled components stay distinct identities; a naive
        // concatenated key would merge these two
        assert_ne!(PageKey::new(1, 23), PageKey::new(12, 3));

        let mut pool = MonthViewPool::new();
        pool.acquire(PageKey::new(1, 23)).set_selected_day(Some(4));
        pool.acquire(PageKey::new(12, 3));

        assert_eq!(pool.live_count(), 2);
        let first = pool.lookup(PageKey::new(1, 23)).expect("first key is live");
        assert_eq!(first.selected_day(), Some(4));
        let second = pool.lookup(PageKey::new(12, 3)).expect("second key is live");
        assert_eq!(second.selected_day(), None);
    }
}
