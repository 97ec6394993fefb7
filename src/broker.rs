use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::CalendarDay;

/// Callback interface for committed selection changes.
///
/// Implementations are registered with [`SelectionBroker::register`]
/// and called after every committed day change.
pub trait SelectionObserver {
    /// Called with the newly committed day after the broker stores it.
    fn on_day_changed(&mut self, day: CalendarDay);
}

/// Registration token handed out by [`SelectionBroker::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Single source of truth for the committed day selection.
///
/// The broker is internally mutable and meant to be shared as
/// `Rc<SelectionBroker>` between the paging controllers and the host,
/// so commits work through any handle. Observers are held strongly;
/// a host drops an observer by unregistering it.
pub struct SelectionBroker {
    selected:  Cell<CalendarDay>,
    observers: RefCell<Vec<(ObserverId, Rc<RefCell<dyn SelectionObserver>>)>>,
    next_id:   Cell<u64>,
}

impl SelectionBroker {
    /// Creates a broker seeded with an initial selection.
    pub fn new(selected: CalendarDay) -> Self {
        Self {
            selected:  Cell::new(selected),
            observers: RefCell::new(Vec::new()),
            next_id:   Cell::new(0),
        }
    }

    /// The committed selection.
    pub fn selected(&self) -> CalendarDay {
        self.selected.get()
    }

    /// Registers an observer and returns its id.
    ///
    /// Registering the same allocation again returns the id it already
    /// holds instead of adding a duplicate entry.
    pub fn register(&self, observer: Rc<RefCell<dyn SelectionObserver>>) -> ObserverId {
        let mut observers = self.observers.borrow_mut();
        if let Some((id, _)) = observers.iter().find(|(_, o)| Rc::ptr_eq(o, &observer)) {
            return *id;
        }
        let id = ObserverId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns false for an unknown id.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Stores `day` as the committed selection, then notifies every
    /// observer once, synchronously, in registration order.
    ///
    /// The day is stored before dispatch and the observer list is not
    /// borrowed while callbacks run, so an observer may read
    /// [`selected`](Self::selected) or adjust registrations from inside
    /// its callback; membership changes take effect from the next
    /// commit. The broker performs no range validation — callers clamp
    /// or validate before committing.
    pub fn commit(&self, day: CalendarDay) {
        self.selected.set(day);
        let snapshot: Vec<Rc<RefCell<dyn SelectionObserver>>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in snapshot {
            observer.borrow_mut().on_day_changed(day);
        }
    }
}

impl fmt::Debug for SelectionBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionBroker")
            .field("selected", &self.selected.get())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
