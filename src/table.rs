//! Tabular view of a resolved schedule for renderers and reports.
//!
//! Rows keep the scheduler's emit order (`order` column). A consumer that
//! wants a chronological layout must ask for it explicitly through
//! [`sort_chronologically`].

use crate::calendar::WorkCalendar;
use crate::task::ScheduledTask;
use chrono::NaiveDate;
use polars::prelude::*;

pub fn schedule_to_dataframe(
    tasks: &[ScheduledTask],
    calendar: &WorkCalendar,
) -> PolarsResult<DataFrame> {
    let order: Vec<u32> = (0..tasks.len() as u32).collect();
    let names: Vec<&str> = tasks.iter().map(|task| task.name()).collect();
    let starts: Vec<Option<i32>> = tasks
        .iter()
        .map(|task| task.spec.start.map(date_to_i32))
        .collect();
    let ends: Vec<Option<i32>> = tasks
        .iter()
        .map(|task| task.spec.end.map(date_to_i32))
        .collect();
    let durations: Vec<Option<u32>> = tasks
        .iter()
        .map(|task| task.spec.has_duration().then_some(task.spec.duration_days))
        .collect();
    let depends_on: Vec<Series> = tasks
        .iter()
        .map(|task| {
            let deps: Vec<&str> = task.spec.depends_on.iter().map(String::as_str).collect();
            Series::new(PlSmallStr::from_static(""), deps)
        })
        .collect();
    let computed_starts: Vec<Option<i32>> = tasks
        .iter()
        .map(|task| Some(date_to_i32(task.computed_start)))
        .collect();
    let computed_ends: Vec<Option<i32>> = tasks
        .iter()
        .map(|task| Some(date_to_i32(task.computed_end)))
        .collect();
    let workdays: Vec<u32> = tasks
        .iter()
        .map(|task| task.workday_span(calendar))
        .collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("order"), order).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        date_series("start", starts)?.into_column(),
        date_series("end", ends)?.into_column(),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        Series::new(PlSmallStr::from_static("depends_on"), depends_on).into_column(),
        date_series("computed_start", computed_starts)?.into_column(),
        date_series("computed_end", computed_ends)?.into_column(),
        Series::new(PlSmallStr::from_static("workdays"), workdays).into_column(),
    ];
    DataFrame::new(columns)
}

/// Re-sort by computed start, then computed end, then name.
pub fn sort_chronologically(df: DataFrame) -> PolarsResult<DataFrame> {
    df.lazy()
        .sort_by_exprs(
            [col("computed_start"), col("computed_end"), col("name")],
            SortMultipleOptions::default(),
        )
        .collect()
}

/// Task names in row order.
pub fn task_names(df: &DataFrame) -> PolarsResult<Vec<String>> {
    Ok(df
        .column("name")?
        .str()?
        .into_iter()
        .flatten()
        .map(ToOwned::to_owned)
        .collect())
}

fn date_series(name: &'static str, days: Vec<Option<i32>>) -> PolarsResult<Series> {
    Series::new(PlSmallStr::from_static(name), days).cast(&DataType::Date)
}

/// Days since the Unix epoch, as polars stores `Date`.
fn date_to_i32(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01
    (date - NaiveDate::default()).num_days() as i32
}
