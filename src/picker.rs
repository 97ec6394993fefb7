use std::cell::RefCell;
use std::rc::Rc;

use crate::broker::{ObserverId, SelectionBroker, SelectionObserver};
use crate::pager::{OutOfRange, PagerController};
use crate::range::{ConstraintError, DateRange};
use crate::years::YearListController;
use crate::{CalendarDay, DateError, MAX_PICKER_YEAR, MIN_PICKER_YEAR, Weekday};

/// Error surface of the picker coordinator.
///
/// Wraps the component errors without reformatting them, so callers
/// see the underlying message while matching on a single type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Top-level coordinator wiring the month pager, the year list and the
/// selection broker into one picker.
///
/// The picker owns both controllers and shares a single broker with
/// them, so a selection committed through any path — a day tap, a year
/// pick, a programmatic set — lands in the same place and reaches every
/// registered observer exactly once. Every outside mutation is
/// validated and clamped here before it touches the controllers.
#[derive(Debug)]
pub struct DatePicker {
    broker:     Rc<SelectionBroker>,
    range:      DateRange,
    week_start: Weekday,
    pager:      PagerController,
    years:      YearListController,
}

impl DatePicker {
    /// Creates a picker seeded with the given selection, spanning the
    /// full supported window (1902 through 2037) until constraints are
    /// applied.
    ///
    /// # Errors
    /// Returns `ConstraintError::BelowAbsoluteMin`/`AboveAbsoluteMax`
    /// when `year` falls outside the supported window, or `DateError`
    /// when the fields do not form a real date.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, PickerError> {
        if year < MIN_PICKER_YEAR {
            return Err(ConstraintError::BelowAbsoluteMin(year).into());
        }
        if year > MAX_PICKER_YEAR {
            return Err(ConstraintError::AboveAbsoluteMax(year).into());
        }
        let initial = CalendarDay::new(year, month, day)?;

        let range = DateRange::default();
        let broker = Rc::new(SelectionBroker::new(initial));
        let mut pager = PagerController::new(range, Weekday::Sunday, Rc::clone(&broker));
        pager.jump_to(initial)?;
        let years = YearListController::new(range, Rc::clone(&broker));

        Ok(Self {
            broker,
            range,
            week_start: Weekday::Sunday,
            pager,
            years,
        })
    }

    /// Creates a picker seeded from a Unix timestamp in milliseconds,
    /// saturated to the supported window.
    ///
    /// # Errors
    /// Infallible in practice since the timestamp saturates; the
    /// `Result` mirrors [`Self::new`].
    pub fn from_epoch_millis(millis: i64) -> Result<Self, PickerError> {
        let day = CalendarDay::from_epoch_millis(millis);
        Self::new(day.year(), day.month(), day.day())
    }

    /// Replaces the selectable range.
    ///
    /// Both controllers adopt the new range, then the selection is
    /// pulled back inside it: a selection the new range orphaned is
    /// clamped and committed (observers fire), one still inside is left
    /// alone. Either way the pager ends on the selection's page.
    ///
    /// # Errors
    /// Returns `ConstraintError` when the bounds are inverted or leave
    /// the supported window; the picker keeps its previous range.
    pub fn set_date_constraints(
        &mut self,
        min: CalendarDay,
        max: CalendarDay,
    ) -> Result<(), PickerError> {
        let range = DateRange::new(min, max)?;
        self.range = range;
        self.pager.on_range_changed(range);
        self.years.on_range_changed(range);

        let selected = self.broker.selected();
        let clamped = range.clamp(selected.year(), selected.month(), selected.day());
        self.pager.jump_to(clamped)?;
        if clamped != selected {
            self.pager.apply_selection(clamped);
        }
        Ok(())
    }

    /// Selects a date programmatically.
    ///
    /// The fields must form a real date; the date is then clamped into
    /// the range, committed, and the pager jumps to its page. Returns
    /// the date actually committed.
    ///
    /// # Errors
    /// Returns `DateError` when the fields do not form a real date.
    pub fn set_selected_date(
        &mut self,
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<CalendarDay, PickerError> {
        let candidate = CalendarDay::new(year, month, day)?;
        let clamped = self
            .range
            .clamp(candidate.year(), candidate.month(), candidate.day());
        self.pager.jump_to(clamped)?;
        self.pager.apply_selection(clamped);
        Ok(clamped)
    }

    /// Commits a year chosen from the year list, carrying the selected
    /// month and day over as closely as the range allows.
    ///
    /// # Errors
    /// Returns `OutOfRange` when `year` is not part of the sequence.
    pub fn select_year(&mut self, year: i32) -> Result<CalendarDay, PickerError> {
        Ok(self.years.select_year(year, &mut self.pager)?)
    }

    /// Reports a tapped day cell; see
    /// [`PagerController::on_day_tapped`].
    ///
    /// # Errors
    /// Returns `DateError` when the fields do not form a real date.
    pub fn on_day_tapped(
        &mut self,
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<Option<CalendarDay>, PickerError> {
        Ok(self.pager.on_day_tapped(year, month, day)?)
    }

    /// Changes the first day of the rendered week.
    pub fn set_first_day_of_week(&mut self, week_start: Weekday) {
        self.week_start = week_start;
        self.pager.set_week_start(week_start);
    }

    /// Injects (or clears) the host's notion of today.
    pub fn set_today(&mut self, today: Option<CalendarDay>) {
        self.pager.set_today(today);
    }

    /// The committed selection.
    pub fn selected_date(&self) -> CalendarDay {
        self.broker.selected()
    }

    /// The active selectable range.
    pub const fn date_range(&self) -> DateRange {
        self.range
    }

    /// First day of the rendered week.
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Subscribes an observer to selection commits. Registering the
    /// same observer twice keeps the original registration.
    pub fn register_observer(&self, observer: Rc<RefCell<dyn SelectionObserver>>) -> ObserverId {
        self.broker.register(observer)
    }

    /// Drops a subscription. Returns false for an unknown id.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.broker.unregister(id)
    }

    /// The month pager, for rendering the page strip.
    pub const fn pager(&self) -> &PagerController {
        &self.pager
    }

    /// The year list, for rendering the year half.
    pub const fn year_list(&self) -> &YearListController {
        &self.years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::cal;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<CalendarDay>,
    }

    impl SelectionObserver for Recorder {
        fn on_day_changed(&mut self, day: CalendarDay) {
            self.seen.push(day);
        }
    }

    fn picker_at(year: i32, month: u8, day: u8) -> DatePicker {
        DatePicker::new(year, month, day).expect("valid picker seed")
    }

    #[test]
    fn test_new_rejects_years_outside_support() {
        let err = DatePicker::new(1901, 0, 1).expect_err("below the floor");
        assert!(matches!(
            err,
            PickerError::Constraint(ConstraintError::BelowAbsoluteMin(1901))
        ));

        let err = DatePicker::new(2038, 0, 1).expect_err("above the ceiling");
        assert!(matches!(
            err,
            PickerError::Constraint(ConstraintError::AboveAbsoluteMax(2038))
        ));
    }

    #[test]
    fn test_new_accepts_the_window_edges() {
        assert!(DatePicker::new(1902, 0, 1).is_ok());
        assert!(DatePicker::new(2037, 11, 31).is_ok());
    }

    #[test]
    fn test_new_rejects_malformed_dates() {
        let err = DatePicker::new(2020, 12, 1).expect_err("month past December");
        assert!(matches!(
            err,
            PickerError::Date(DateError::InvalidMonth(12))
        ));

        let err = DatePicker::new(2023, 1, 29).expect_err("Feb 29 in a common year");
        assert!(matches!(err, PickerError::Date(DateError::InvalidDay { .. })));
    }

    #[test]
    fn test_new_seeds_selection_pager_and_years() {
        let picker = picker_at(2020, 5, 17);

        assert_eq!(picker.selected_date(), cal(2020, 5, 17));
        assert_eq!(picker.date_range(), DateRange::default());
        assert_eq!(picker.week_start(), Weekday::Sunday);

        // June 2020 sits 118 years and 5 months past the range origin
        assert_eq!(picker.pager().current_position(), 1421);
        let page = picker.pager().page_at(1421).expect("seed page is live");
        assert_eq!(page.selected_day(), Some(17));

        assert_eq!(picker.year_list().years().len(), 136);
        assert_eq!(picker.year_list().selected_index(), Some(118));
    }

    #[test]
    fn test_from_epoch_millis_seeds_the_selection() {
        let picker = DatePicker::from_epoch_millis(951_782_400_000).expect("valid timestamp");
        assert_eq!(picker.selected_date(), cal(2000, 1, 29));

        // out-of-window timestamps saturate instead of failing
        let picker = DatePicker::from_epoch_millis(i64::MAX).expect("saturated timestamp");
        assert_eq!(picker.selected_date(), cal(2037, 11, 31));
    }

    #[test]
    fn test_set_date_constraints_reclamps_an_orphaned_selection() {
        let mut picker = picker_at(2020, 5, 17);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        picker.register_observer(recorder.clone());

        picker
            .set_date_constraints(cal(2020, 5, 1), cal(2020, 5, 10))
            .expect("valid bounds");

        assert_eq!(picker.selected_date(), cal(2020, 5, 10));
        assert_eq!(recorder.borrow().seen, vec![cal(2020, 5, 10)]);

        assert_eq!(picker.pager().month_count(), 1);
        assert_eq!(picker.pager().current_position(), 0);
        let page = picker.pager().page_at(0).expect("page is live");
        assert_eq!(page.selected_day(), Some(10));
        assert!(page.is_day_disabled(11));
    }

    #[test]
    fn test_set_date_constraints_leaves_an_inside_selection_alone() {
        let mut picker = picker_at(2020, 5, 17);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        picker.register_observer(recorder.clone());

        picker
            .set_date_constraints(cal(2020, 0, 1), cal(2020, 11, 31))
            .expect("valid bounds");

        assert_eq!(picker.selected_date(), cal(2020, 5, 17));
        assert!(recorder.borrow().seen.is_empty(), "no spurious commit");

        // the pager re-centered on the selection under the new origin
        assert_eq!(picker.pager().current_position(), 5);
        let page = picker.pager().page_at(5).expect("page is live");
        assert_eq!(page.selected_day(), Some(17));
    }

    #[test]
    fn test_set_date_constraints_rejects_inverted_bounds() {
        let mut picker = picker_at(2020, 5, 17);

        let err = picker
            .set_date_constraints(cal(2020, 5, 10), cal(2020, 5, 1))
            .expect_err("min after max");
        assert!(matches!(
            err,
            PickerError::Constraint(ConstraintError::StartAfterEnd { .. })
        ));

        // the picker kept its previous state
        assert_eq!(picker.date_range(), DateRange::default());
        assert_eq!(picker.selected_date(), cal(2020, 5, 17));
    }

    #[test]
    fn test_set_selected_date_clamps_into_range() {
        let mut picker = picker_at(2020, 5, 17);
        picker
            .set_date_constraints(cal(2020, 5, 15), cal(2020, 5, 20))
            .expect("valid bounds");

        let committed = picker.set_selected_date(2020, 8, 25).expect("valid fields");
        assert_eq!(committed, cal(2020, 5, 20), "pulled down to the max");
        assert_eq!(picker.selected_date(), cal(2020, 5, 20));

        let committed = picker.set_selected_date(2020, 8, 1).expect("valid fields");
        assert_eq!(committed, cal(2020, 5, 15), "day pulled up to the min edge");

        let err = picker.set_selected_date(2020, 12, 1).expect_err("bad month");
        assert!(matches!(
            err,
            PickerError::Date(DateError::InvalidMonth(12))
        ));
    }

    #[test]
    fn test_select_year_carries_the_selection() {
        let mut picker = picker_at(2024, 1, 29);

        let committed = picker.select_year(2023).expect("2023 is listed");
        assert_eq!(committed, cal(2023, 1, 28));
        assert_eq!(picker.selected_date(), cal(2023, 1, 28));
        assert_eq!(picker.pager().current_position(), 1453);

        let err = picker.select_year(1890).expect_err("before the sequence");
        assert!(matches!(err, PickerError::OutOfRange(_)));
        assert_eq!(picker.selected_date(), cal(2023, 1, 28));
    }

    #[test]
    fn test_set_first_day_of_week_rebinds_pages() {
        let mut picker = picker_at(2020, 5, 17);

        let page = picker.pager().page_at(1421).expect("page is live");
        assert_eq!(page.day_offset(), 1, "June 2020 starts on Monday");

        picker.set_first_day_of_week(Weekday::Monday);
        assert_eq!(picker.week_start(), Weekday::Monday);
        let page = picker.pager().page_at(1421).expect("page is live");
        assert_eq!(page.day_offset(), 0);
    }

    #[test]
    fn test_set_today_marks_the_matching_page() {
        let mut picker = picker_at(2020, 5, 17);

        picker.set_today(Some(cal(2020, 5, 9)));
        let page = picker.pager().page_at(1421).expect("page is live");
        assert_eq!(page.today(), Some(9));

        picker.set_today(None);
        let page = picker.pager().page_at(1421).expect("page is live");
        assert_eq!(page.today(), None);
    }

    #[test]
    fn test_taps_flow_through_to_observers() {
        let mut picker = picker_at(2020, 5, 17);
        picker
            .set_date_constraints(cal(2020, 5, 15), cal(2020, 5, 20))
            .expect("valid bounds");

        let recorder = Rc::new(RefCell::new(Recorder::default()));
        picker.register_observer(recorder.clone());

        let accepted = picker.on_day_tapped(2020, 5, 18).expect("valid fields");
        assert_eq!(accepted, Some(cal(2020, 5, 18)));
        assert_eq!(recorder.borrow().seen, vec![cal(2020, 5, 18)]);

        let ignored = picker.on_day_tapped(2020, 5, 14).expect("valid fields");
        assert_eq!(ignored, None);
        assert_eq!(recorder.borrow().seen.len(), 1, "disabled tap stays silent");
    }

    #[test]
    fn test_unregister_observer_stops_delivery() {
        let mut picker = picker_at(2020, 5, 17);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = picker.register_observer(recorder.clone());

        picker.set_selected_date(2020, 5, 18).expect("valid fields");
        assert_eq!(recorder.borrow().seen.len(), 1);

        assert!(picker.unregister_observer(id));
        assert!(!picker.unregister_observer(id), "already gone");

        picker.set_selected_date(2020, 5, 19).expect("valid fields");
        assert_eq!(recorder.borrow().seen.len(), 1, "no delivery after removal");
    }
}
