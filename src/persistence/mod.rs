use crate::calendar::CalendarError;
use crate::validation::ValidationError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    InvalidRecord { row: u64, message: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl PersistenceError {
    pub(crate) fn record(row: u64, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row,
            message: message.into(),
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;
pub mod records;

pub use file::{
    ScheduleSnapshot, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
pub use records::{read_tasks, read_tasks_from_csv};
