use super::{PersistenceError, PersistenceResult};
use crate::calendar::{WorkCalendar, WorkCalendarConfig};
use crate::task::ScheduledTask;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// A resolved schedule together with the calendar it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub calendar: WorkCalendarConfig,
    /// Tasks in the order the scheduler emitted them.
    pub tasks: Vec<ScheduledTask>,
}

impl ScheduleSnapshot {
    pub fn new(calendar: &WorkCalendar, tasks: Vec<ScheduledTask>) -> Self {
        Self {
            calendar: calendar.to_config(),
            tasks,
        }
    }

    pub fn work_calendar(&self) -> PersistenceResult<WorkCalendar> {
        Ok(WorkCalendar::from_config(&self.calendar)?)
    }

    fn validate(&self) -> PersistenceResult<()> {
        let mut names = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if !names.insert(task.name()) {
                return Err(PersistenceError::InvalidData(format!(
                    "duplicate task name {:?}",
                    task.name()
                )));
            }
            if task.computed_end < task.computed_start {
                return Err(PersistenceError::InvalidData(format!(
                    "task {:?} ends on {} before its start {}",
                    task.name(),
                    task.computed_end,
                    task.computed_start
                )));
            }
        }
        Ok(())
    }
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    tasks: &[ScheduledTask],
    calendar: &WorkCalendar,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::new(calendar, tasks.to_vec());
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ScheduleSnapshot> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.validate()?;
    // Reject calendars that could never be rebuilt.
    snapshot.work_calendar()?;
    Ok(snapshot)
}

#[derive(Default, Serialize)]
struct ScheduledCsvRecord {
    order: usize,
    name: String,
    start: String,
    end: String,
    duration_days: String,
    depends_on: String,
    computed_start: String,
    computed_end: String,
    workdays: u32,
    actual_start: String,
    actual_end: String,
    notes: String,
}

impl ScheduledCsvRecord {
    fn new(order: usize, task: &ScheduledTask, calendar: &WorkCalendar) -> Self {
        let spec = &task.spec;
        let mut record = ScheduledCsvRecord::default();
        record.order = order;
        record.name = spec.name.clone();
        record.start = format_date(spec.start);
        record.end = format_date(spec.end);
        if spec.has_duration() {
            record.duration_days = spec.duration_days.to_string();
        }
        record.depends_on = spec.depends_on.join(",");
        record.computed_start = format_date(Some(task.computed_start));
        record.computed_end = format_date(Some(task.computed_end));
        record.workdays = task.workday_span(calendar);
        record.actual_start = format_date(task.computed_actual.map(|window| window.start));
        record.actual_end = format_date(task.computed_actual.map(|window| window.end));
        record.notes = spec.notes.clone().unwrap_or_default();
        record
    }
}

/// One row per task, in emitted order.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    tasks: &[ScheduledTask],
    calendar: &WorkCalendar,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (order, task) in tasks.iter().enumerate() {
        writer.serialize(ScheduledCsvRecord::new(order, task, calendar))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
