use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

pub mod holidays;
pub mod shared;

pub use holidays::{HolidayFileError, load_holidays_yaml, parse_holidays_yaml};
pub use shared::SharedCalendar;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("work calendar requires at least one working day")]
    NoWorkingDays,
}

/// Classifies dates as workdays and moves dates forward in workday steps.
///
/// Every date the scheduler derives passes through one of the `next_workday*`
/// helpers, so a computed boundary never lands on a weekend or a holiday
/// unless the all-workdays override is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkCalendarConfig", into = "WorkCalendarConfig")]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
    all_workdays: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    #[serde(default)]
    holidays: Vec<NaiveDate>,
    #[serde(default)]
    all_workdays: bool,
}

/// Anything that can be reduced to a civil calendar day.
pub trait CivilDay {
    fn civil_day(&self) -> NaiveDate;
}

impl CivilDay for NaiveDate {
    fn civil_day(&self) -> NaiveDate {
        *self
    }
}

impl CivilDay for NaiveDateTime {
    fn civil_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CivilDay for DateTime<Tz> {
    /// The day as seen on the wall clock of the value's own time zone.
    fn civil_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Drop any sub-day component so comparisons happen at day granularity.
pub fn normalize_to_day<D: CivilDay>(date: &D) -> NaiveDate {
    date.civil_day()
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            all_workdays: false,
        }
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Mon-Fri work week with no holidays.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut calendar = Self::default();
        calendar.set_holidays(holidays);
        calendar
    }

    pub fn custom<I, J>(working_days: I, holidays: J) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = WorkCalendarConfig::new(working_days, holidays);
        Self::from_config(&config)
    }

    pub fn from_config(config: &WorkCalendarConfig) -> Result<Self, CalendarError> {
        let mut calendar = Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days: HashSet::new(),
            all_workdays: config.all_workdays,
        };
        calendar.set_working_days(config.working_days.iter().copied())?;
        Ok(calendar)
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    /// Replace the holiday set wholesale.
    pub fn set_holidays<I>(&mut self, holidays: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.holidays = holidays.into_iter().collect();
        debug!(holiday_count = self.holidays.len(), "holiday set replaced");
    }

    /// Holidays in ascending order.
    pub fn holidays(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.holidays.iter().copied().collect();
        dates.sort();
        dates
    }

    /// When enabled every date counts as a workday, weekends and holidays included.
    pub fn set_all_workdays(&mut self, enabled: bool) {
        self.all_workdays = enabled;
    }

    pub fn all_workdays(&self) -> bool {
        self.all_workdays
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days<I>(&mut self, days: I) -> Result<(), CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let working: HashSet<Weekday> = days.into_iter().collect();
        if working.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        self.non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working.contains(day))
            .collect();
        Ok(())
    }

    pub fn working_days(&self) -> Vec<Weekday> {
        Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !self.non_working_days.contains(day))
            .collect()
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        if self.all_workdays {
            return true;
        }
        !self.non_working_days.contains(&date.weekday()) && !self.holidays.contains(&date)
    }

    /// The date itself when it is a workday, otherwise the first workday after it.
    ///
    /// This is a linear scan rather than a formula because holiday sets are
    /// irregular. It terminates since the week keeps at least one working day
    /// and the holiday set is finite.
    pub fn next_workday(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_workday(current) {
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// First workday strictly after `date`.
    pub fn next_workday_after(&self, date: NaiveDate) -> NaiveDate {
        match date.succ_opt() {
            Some(next) => self.next_workday(next),
            None => date,
        }
    }

    /// Snap `date` onto a workday, then advance `days` further workdays.
    ///
    /// `add_workdays(d, 0)` equals `next_workday(d)`, so a task lasting `n`
    /// workdays ends at `add_workdays(start, n - 1)`.
    pub fn add_workdays(&self, date: NaiveDate, days: u32) -> NaiveDate {
        let mut current = self.next_workday(date);
        for _ in 0..days {
            current = self.next_workday_after(current);
        }
        current
    }

    /// Workdays in the inclusive range `start..=end`.
    pub fn workdays_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_workday(*day))
            .collect()
    }

    /// Count workdays in the inclusive range; zero when `end` precedes `start`.
    pub fn count_workdays(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let mut count = 0;
        for day in start.iter_days().take_while(|day| *day <= end) {
            if self.is_workday(day) {
                count += 1;
            }
        }
        count
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: working,
            holidays,
            all_workdays: false,
        }
    }

    pub fn with_all_workdays(mut self, enabled: bool) -> Self {
        self.all_workdays = enabled;
        self
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }

    pub fn all_workdays(&self) -> bool {
        self.all_workdays
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl TryFrom<WorkCalendarConfig> for WorkCalendar {
    type Error = CalendarError;

    fn try_from(config: WorkCalendarConfig) -> Result<Self, Self::Error> {
        WorkCalendar::from_config(&config)
    }
}

impl From<WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: WorkCalendar) -> Self {
        WorkCalendarConfig::from(&calendar)
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        WorkCalendarConfig::new(calendar.working_days(), calendar.holidays())
            .with_all_workdays(calendar.all_workdays)
    }
}
