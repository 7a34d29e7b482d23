use crate::calendar::WorkCalendar;
use crate::error::ScheduleError;
use crate::task::{ActualWindow, TaskSpec};
use chrono::NaiveDate;

/// Dates resolved for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub actual: Option<ActualWindow>,
}

/// Computes a single task's window from its declaration and the ends of its
/// already-resolved dependencies.
pub struct ForwardPass<'a> {
    calendar: &'a WorkCalendar,
}

impl<'a> ForwardPass<'a> {
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self { calendar }
    }

    /// `dependency_ends` holds the computed end of every dependency.
    pub fn resolve<I>(
        &self,
        task: &TaskSpec,
        dependency_ends: I,
    ) -> Result<ResolvedDates, ScheduleError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let start = self.start_date(task, dependency_ends)?;
        let end = self.end_date(task, start)?;
        let actual = match &task.actual {
            Some(actual) => actual
                .resolve(self.calendar)
                .map_err(|source| ScheduleError::InvalidActual {
                    task: task.name.clone(),
                    source,
                })?,
            None => None,
        };
        Ok(ResolvedDates { start, end, actual })
    }

    fn start_date<I>(&self, task: &TaskSpec, dependency_ends: I) -> Result<NaiveDate, ScheduleError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let declared_floor = task.start.map(|date| self.calendar.next_workday(date));

        // Strict maximum; equal ends give the same next workday either way.
        let mut latest_end: Option<NaiveDate> = None;
        for end in dependency_ends {
            if latest_end.is_none_or(|latest| end > latest) {
                latest_end = Some(end);
            }
        }
        let dependency_floor = latest_end.map(|end| self.calendar.next_workday_after(end));

        match (declared_floor, dependency_floor) {
            (Some(declared), Some(dependency)) => Ok(declared.max(dependency)),
            (Some(floor), None) | (None, Some(floor)) => Ok(floor),
            (None, None) => Err(ScheduleError::UnresolvableStart {
                task: task.name.clone(),
            }),
        }
    }

    fn end_date(&self, task: &TaskSpec, start: NaiveDate) -> Result<NaiveDate, ScheduleError> {
        if let Some(end) = task.end {
            let end = self.calendar.next_workday(end);
            if end < start {
                return Err(ScheduleError::InvalidEndBeforeStart {
                    task: task.name.clone(),
                    start,
                    end,
                });
            }
            Ok(end)
        } else if task.has_duration() {
            Ok(self.calendar.add_workdays(start, task.duration_days - 1))
        } else {
            Err(ScheduleError::UnresolvableDuration {
                task: task.name.clone(),
            })
        }
    }
}
