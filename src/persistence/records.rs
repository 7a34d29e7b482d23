//! Task records from delimited text.
//!
//! Required header columns: `name,start,end,duration,depends_on`.
//! Optional: `actual_start,actual_end,actual_duration,notes`. Header names
//! are matched case-insensitively after trimming; unknown columns are ignored.

use super::{PersistenceError, PersistenceResult};
use crate::task::{ActualSpec, TaskSpec};
use crate::validation::{validate_task, validate_tasks};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const REQUIRED_COLUMNS: [&str; 5] = ["name", "start", "end", "duration", "depends_on"];

// %m and %d accept one or two digits when parsing
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> PersistenceResult<Self> {
        let indices: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.trim().to_lowercase(), idx))
            .collect();
        for column in REQUIRED_COLUMNS {
            if !indices.contains_key(column) {
                return Err(PersistenceError::MissingColumn(column.to_string()));
            }
        }
        Ok(Self { indices })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.indices
            .get(column)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

pub fn read_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskSpec>> {
    let file = File::open(path)?;
    read_tasks(file)
}

/// Parse and validate task records. Row numbers in errors count records,
/// with the header as row 1, so a quoted field spanning lines still counts
/// as one row.
///
/// Heading rows (name starting with `#`) and rows carrying only a name and
/// notes hold nothing to schedule and are skipped.
pub fn read_tasks<R: Read>(input: R) -> PersistenceResult<Vec<TaskSpec>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);
    let columns = ColumnMap::from_header(reader.headers()?)?;

    let mut tasks = Vec::new();
    let mut names = HashSet::new();
    for (offset, result) in reader.records().enumerate() {
        let row = offset as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                if let csv::ErrorKind::UnequalLengths { .. } = err.kind() {
                    return Err(PersistenceError::record(row, "inconsistent field count"));
                }
                return Err(PersistenceError::Csv(err));
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let Some(task) = parse_record(&record, &columns, row)? else {
            continue;
        };
        validate_task(&task).map_err(|err| PersistenceError::record(row, err.to_string()))?;
        if !names.insert(task.name.clone()) {
            return Err(PersistenceError::record(
                row,
                format!("duplicate task name {:?}", task.name),
            ));
        }
        tasks.push(task);
    }

    validate_tasks(&tasks)?;
    debug!(task_count = tasks.len(), "read task records");
    Ok(tasks)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnMap,
    row: u64,
) -> PersistenceResult<Option<TaskSpec>> {
    let field = |column: &str| columns.get(record, column);

    let name = field("name");
    if let Some(heading) = name.strip_prefix('#') {
        debug!(row, heading = heading.trim(), "skipping heading row");
        return Ok(None);
    }

    let start = field("start");
    let end = field("end");
    let duration = field("duration");
    let depends = field("depends_on");
    let actual_start = field("actual_start");
    let actual_end = field("actual_end");
    let actual_duration = field("actual_duration");
    let notes = field("notes");

    let scheduling = [
        start,
        end,
        duration,
        depends,
        actual_start,
        actual_end,
        actual_duration,
    ];
    if !name.is_empty() && scheduling.iter().all(|value| value.is_empty()) {
        debug!(row, task = name, "skipping display-only row");
        return Ok(None);
    }
    if name.is_empty() {
        return Err(PersistenceError::record(row, "name is required"));
    }

    let invalid = |column: &str, message: String| {
        PersistenceError::record(row, format!("invalid {column}: {message}"))
    };

    let mut task = TaskSpec::new(name);
    task.depends_on = parse_depends(depends);
    task.start = parse_optional_date(start).map_err(|msg| invalid("start", msg))?;
    task.end = parse_optional_date(end).map_err(|msg| invalid("end", msg))?;
    task.duration_days = parse_optional_duration(duration).map_err(|msg| invalid("duration", msg))?;
    if !notes.is_empty() {
        task.notes = Some(notes.to_string());
    }

    let actual = ActualSpec {
        start: parse_optional_date(actual_start).map_err(|msg| invalid("actual_start", msg))?,
        end: parse_optional_date(actual_end).map_err(|msg| invalid("actual_end", msg))?,
        duration_days: parse_optional_duration(actual_duration)
            .map_err(|msg| invalid("actual_duration", msg))?,
    };
    if !actual.is_empty() {
        task.actual = Some(actual);
    }

    Ok(Some(task))
}

/// Split on `,` or `;`, dropping blanks.
fn parse_depends(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(Some)
        .ok_or_else(|| format!("invalid date {raw:?} (expected YYYY-MM-DD or YYYY/MM/DD)"))
}

/// `Nd` with a positive integer `N`; an empty field means "not set".
fn parse_optional_duration(raw: &str) -> Result<u32, String> {
    if raw.is_empty() {
        return Ok(0);
    }
    if raw.len() < 2 {
        return Err("duration must be Nd (e.g. 5d)".to_string());
    }
    let Some(number) = raw.strip_suffix(['d', 'D']) else {
        return Err("duration must end with 'd'".to_string());
    };
    match number.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err("duration must be a positive integer followed by 'd'".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depends_split_on_comma_and_semicolon() {
        assert_eq!(
            parse_depends(" Design, Planning;;Review "),
            vec!["Design", "Planning", "Review"]
        );
        assert!(parse_depends("").is_empty());
    }

    #[test]
    fn dates_accept_dash_and_slash_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 7);
        assert_eq!(parse_optional_date("2024-06-07").unwrap(), expected);
        assert_eq!(parse_optional_date("2024-6-7").unwrap(), expected);
        assert_eq!(parse_optional_date("2024/06/07").unwrap(), expected);
        assert_eq!(parse_optional_date("2024/6/7").unwrap(), expected);
        assert_eq!(parse_optional_date("").unwrap(), None);
        assert!(parse_optional_date("07.06.2024").is_err());
    }

    #[test]
    fn durations_need_day_suffix() {
        assert_eq!(parse_optional_duration("5d"), Ok(5));
        assert_eq!(parse_optional_duration("12D"), Ok(12));
        assert_eq!(parse_optional_duration(""), Ok(0));
        assert!(parse_optional_duration("5").is_err());
        assert!(parse_optional_duration("0d").is_err());
        assert!(parse_optional_duration("-3d").is_err());
        assert!(parse_optional_duration("xd").is_err());
    }
}
