use crate::calendar::WorkCalendar;
use crate::error::ActualError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task as declared by the input, before any dates are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Length in workdays; zero means "not set".
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<ActualSpec>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    pub fn with_end(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_actual(mut self, actual: ActualSpec) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    pub fn has_end(&self) -> bool {
        self.end.is_some()
    }

    pub fn has_duration(&self) -> bool {
        self.duration_days > 0
    }

    pub fn has_dependencies(&self) -> bool {
        !self.depends_on.is_empty()
    }
}

/// Recorded progress for a task: what actually happened, as opposed to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActualSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub duration_days: u32,
}

impl ActualSpec {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.duration_days == 0
    }

    /// Structural checks that need no calendar.
    pub fn check(&self) -> Result<(), ActualError> {
        if self.end.is_some() && self.duration_days > 0 {
            return Err(ActualError::EndAndDuration);
        }
        if self.end.is_some() && self.start.is_none() {
            return Err(ActualError::EndWithoutStart);
        }
        if self.duration_days > 0 && self.start.is_none() {
            return Err(ActualError::DurationWithoutStart);
        }
        Ok(())
    }

    /// Resolve into a workday-snapped window; `None` when nothing was recorded.
    pub fn resolve(&self, calendar: &WorkCalendar) -> Result<Option<ActualWindow>, ActualError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.check()?;

        let Some(start) = self.start.map(|date| calendar.next_workday(date)) else {
            return Err(ActualError::DurationWithoutStart);
        };
        let end = match self.end {
            Some(end) => {
                let end = calendar.next_workday(end);
                if end < start {
                    return Err(ActualError::EndBeforeStart { start, end });
                }
                end
            }
            None if self.duration_days > 0 => {
                calendar.add_workdays(start, self.duration_days - 1)
            }
            None => start,
        };
        Ok(Some(ActualWindow { start, end }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A task with its resolved, workday-snapped dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    #[serde(flatten)]
    pub spec: TaskSpec,
    pub computed_start: NaiveDate,
    pub computed_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_actual: Option<ActualWindow>,
}

impl ScheduledTask {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Workdays covered by the computed window, both ends included.
    pub fn workday_span(&self, calendar: &WorkCalendar) -> u32 {
        calendar.count_workdays(self.computed_start, self.computed_end)
    }
}
