//! Holiday list loading.
//!
//! A holiday file is YAML in one of two shapes:
//!
//! ```yaml
//! holidays:
//!   - 2024-09-16
//!   - 2024-09-23
//! ```
//!
//! or a bare top-level list of `YYYY-MM-DD` strings.

use super::WorkCalendar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum HolidayFileError {
    #[error("read holidays file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("decode holidays yaml: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("parse holiday {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HolidayDocument {
    Keyed { holidays: Vec<String> },
    List(Vec<String>),
}

impl HolidayDocument {
    fn into_values(self) -> Vec<String> {
        match self {
            HolidayDocument::Keyed { holidays } => holidays,
            HolidayDocument::List(values) => values,
        }
    }
}

pub fn load_holidays_yaml<P: AsRef<Path>>(path: P) -> Result<Vec<NaiveDate>, HolidayFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| HolidayFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dates = parse_holidays_yaml(&text)?;
    debug!(path = %path.display(), holiday_count = dates.len(), "loaded holiday file");
    Ok(dates)
}

/// Blank entries are skipped; any other unparsable entry is an error.
///
/// An empty or comment-only document means no holidays.
pub fn parse_holidays_yaml(text: &str) -> Result<Vec<NaiveDate>, HolidayFileError> {
    let document: Option<HolidayDocument> = serde_yaml::from_str(text)?;
    document
        .map(HolidayDocument::into_values)
        .unwrap_or_default()
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(|value| {
            NaiveDate::parse_from_str(&value, DATE_FORMAT)
                .map_err(|source| HolidayFileError::InvalidDate { value, source })
        })
        .collect()
}

impl WorkCalendar {
    /// Mon-Fri calendar whose holiday set comes from a YAML file.
    pub fn with_holiday_file<P: AsRef<Path>>(path: P) -> Result<Self, HolidayFileError> {
        let holidays = load_holidays_yaml(path)?;
        Ok(Self::with_holidays(holidays))
    }
}
