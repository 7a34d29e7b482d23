//! Checks applied at the input boundary, before a task list reaches the scheduler.

use crate::error::ActualError;
use crate::task::TaskSpec;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name is required")]
    MissingName,

    #[error("task {task:?}: end and duration cannot both be set")]
    EndAndDuration { task: String },

    #[error("task {task:?}: end cannot be set without start or duration")]
    EndWithoutStart { task: String },

    #[error("task {task:?}: either duration or end must be provided")]
    MissingDurationOrEnd { task: String },

    #[error("task {task:?}: duration-only task must depend on another task or define a start")]
    Unanchored { task: String },

    #[error("task {task:?}: {source}")]
    Actual { task: String, source: ActualError },

    #[error("duplicate task name {task:?}")]
    DuplicateName { task: String },

    #[error("task {task:?} depends on unknown task {dependency:?}")]
    UnknownDependency { task: String, dependency: String },
}

pub fn validate_task(task: &TaskSpec) -> Result<(), ValidationError> {
    if task.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let name = || task.name.clone();

    if task.has_end() && task.has_duration() {
        return Err(ValidationError::EndAndDuration { task: name() });
    }
    if task.has_end() && !task.has_start() {
        return Err(ValidationError::EndWithoutStart { task: name() });
    }
    if !task.has_end() && !task.has_duration() {
        return Err(ValidationError::MissingDurationOrEnd { task: name() });
    }
    if !task.has_start() && !task.has_dependencies() {
        return Err(ValidationError::Unanchored { task: name() });
    }

    if let Some(actual) = &task.actual {
        actual
            .check()
            .map_err(|source| ValidationError::Actual { task: name(), source })?;
    }

    Ok(())
}

/// Validate each task, then the references between them.
pub fn validate_tasks(tasks: &[TaskSpec]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        validate_task(task)?;
        if !seen.insert(task.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                task: task.name.clone(),
            });
        }
    }

    for task in tasks {
        if let Some(dependency) = task
            .depends_on
            .iter()
            .find(|dep| !seen.contains(dep.as_str()))
        {
            return Err(ValidationError::UnknownDependency {
                task: task.name.clone(),
                dependency: dependency.clone(),
            });
        }
    }
    Ok(())
}
