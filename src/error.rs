//! Errors raised while resolving a schedule.
//!
//! Every variant is fatal to the run: no partial schedule is ever returned.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("no tasks to schedule")]
    EmptyInput,

    #[error("duplicate task name {task:?}")]
    DuplicateTask { task: String },

    #[error("task {task:?} lacks a resolvable start date")]
    UnresolvableStart { task: String },

    #[error("task {task:?} ends on {end} before it can start on {start}")]
    InvalidEndBeforeStart {
        task: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("task {task:?} lacks duration or end")]
    UnresolvableDuration { task: String },

    #[error("dependency {dependency:?} for task {task:?} not scheduled")]
    DanglingDependency { task: String, dependency: String },

    /// `tasks` names the tasks sitting on a cycle, sorted.
    #[error("cyclic dependency detected among tasks: {}", .tasks.join(", "))]
    CyclicDependency { tasks: Vec<String> },

    #[error("task {task:?} has unresolvable actual dates: {source}")]
    InvalidActual { task: String, source: ActualError },
}

impl ScheduleError {
    /// Name of the offending task, when the error concerns exactly one.
    pub fn task(&self) -> Option<&str> {
        match self {
            ScheduleError::EmptyInput | ScheduleError::CyclicDependency { .. } => None,
            ScheduleError::DuplicateTask { task }
            | ScheduleError::UnresolvableStart { task }
            | ScheduleError::InvalidEndBeforeStart { task, .. }
            | ScheduleError::UnresolvableDuration { task }
            | ScheduleError::DanglingDependency { task, .. }
            | ScheduleError::InvalidActual { task, .. } => Some(task),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActualError {
    #[error("actual_end and actual_duration cannot both be set")]
    EndAndDuration,

    #[error("actual_end cannot be set without actual_start or actual_duration")]
    EndWithoutStart,

    #[error("actual_duration requires actual_start")]
    DurationWithoutStart,

    #[error("actual_end {end} is before actual_start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}
