use super::{HolidayFileError, WorkCalendar, load_holidays_yaml};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Process-wide calendar for regenerate-on-change workflows.
///
/// Writers never mutate a calendar in place: each write builds a new
/// `WorkCalendar` and swaps the snapshot, so a run holding an older
/// snapshot keeps a consistent view until it finishes.
#[derive(Debug, Clone, Default)]
pub struct SharedCalendar {
    current: Arc<RwLock<Arc<WorkCalendar>>>,
}

impl SharedCalendar {
    pub fn new(calendar: WorkCalendar) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(calendar))),
        }
    }

    pub fn snapshot(&self) -> Arc<WorkCalendar> {
        self.current.read().clone()
    }

    pub fn replace(&self, calendar: WorkCalendar) {
        *self.current.write() = Arc::new(calendar);
    }

    pub fn set_holidays<I>(&self, holidays: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.update(|calendar| calendar.set_holidays(holidays));
    }

    pub fn set_all_workdays(&self, enabled: bool) {
        self.update(|calendar| calendar.set_all_workdays(enabled));
    }

    /// Re-read a holiday file and publish it; returns the number of holidays loaded.
    ///
    /// On error the current snapshot is left untouched.
    pub fn reload_holidays<P: AsRef<Path>>(&self, path: P) -> Result<usize, HolidayFileError> {
        let holidays = load_holidays_yaml(path)?;
        let count = holidays.len();
        self.set_holidays(holidays);
        Ok(count)
    }

    fn update<F>(&self, mutator: F)
    where
        F: FnOnce(&mut WorkCalendar),
    {
        let mut guard = self.current.write();
        let mut next = WorkCalendar::clone(&guard);
        mutator(&mut next);
        *guard = Arc::new(next);
    }
}
