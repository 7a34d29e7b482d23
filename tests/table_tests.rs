use chrono::NaiveDate;
use polars::prelude::*;
use timeline_scheduler::{
    TaskSpec, WorkCalendar, schedule, schedule_to_dataframe, sort_chronologically, task_names,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn days(date: NaiveDate) -> i32 {
    (date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days() as i32
}

fn scheduled_frame() -> DataFrame {
    let cal = WorkCalendar::default();
    let tasks = vec![
        TaskSpec::new("Alpha").with_start(d(2024, 6, 20)).with_duration(2),
        TaskSpec::new("Zeta").with_start(d(2024, 6, 3)).with_duration(1),
        TaskSpec::new("Build")
            .with_dependency("Zeta")
            .with_duration(3)
            .with_notes("needs review"),
    ];
    let scheduled = schedule(tasks, &cal).unwrap();
    schedule_to_dataframe(&scheduled, &cal).unwrap()
}

#[test]
fn frame_keeps_emit_order() {
    let df = scheduled_frame();
    assert_eq!(df.height(), 3);
    assert_eq!(task_names(&df).unwrap(), vec!["Alpha", "Zeta", "Build"]);

    let order: Vec<Option<u32>> = df.column("order").unwrap().u32().unwrap().into_iter().collect();
    assert_eq!(order, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn frame_has_expected_columns_and_types() {
    let df = scheduled_frame();
    for name in [
        "order",
        "name",
        "start",
        "end",
        "duration_days",
        "depends_on",
        "computed_start",
        "computed_end",
        "workdays",
    ] {
        assert!(df.column(name).is_ok(), "missing column {name}");
    }
    assert_eq!(df.width(), 9);
    assert_eq!(df.column("computed_start").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("start").unwrap().dtype(), &DataType::Date);
}

#[test]
fn frame_carries_computed_dates_and_spans() {
    let df = scheduled_frame();
    let starts = df.column("computed_start").unwrap().date().unwrap();
    let ends = df.column("computed_end").unwrap().date().unwrap();
    let workdays = df.column("workdays").unwrap().u32().unwrap();

    // Build follows Zeta (Monday 2024-06-03) and runs three workdays
    assert_eq!(starts.get(2), Some(days(d(2024, 6, 4))));
    assert_eq!(ends.get(2), Some(days(d(2024, 6, 6))));
    assert_eq!(workdays.get(2), Some(3));
    assert_eq!(workdays.get(0), Some(2));
}

#[test]
fn undeclared_inputs_are_null() {
    let df = scheduled_frame();
    let declared_start = df.column("start").unwrap().date().unwrap();
    assert_eq!(declared_start.get(0), Some(days(d(2024, 6, 20))));
    assert_eq!(declared_start.get(2), None);
    assert_eq!(df.column("end").unwrap().null_count(), 3);

    let deps = df.column("depends_on").unwrap().list().unwrap();
    let build_deps = deps.get_as_series(2).unwrap();
    let build_deps: Vec<Option<&str>> = build_deps.str().unwrap().into_iter().collect();
    assert_eq!(build_deps, vec![Some("Zeta")]);
    assert_eq!(deps.get_as_series(0).unwrap().len(), 0);
}

#[test]
fn chronological_sort_is_explicit() {
    let df = sort_chronologically(scheduled_frame()).unwrap();
    assert_eq!(task_names(&df).unwrap(), vec!["Zeta", "Build", "Alpha"]);
}

#[test]
fn chronological_sort_breaks_ties_by_name() {
    let cal = WorkCalendar::default();
    let tasks = vec![
        TaskSpec::new("Root").with_start(d(2024, 6, 3)).with_duration(1),
        TaskSpec::new("Second").with_dependency("Root").with_duration(1),
        TaskSpec::new("First").with_dependency("Root").with_duration(1),
    ];
    let scheduled = schedule(tasks, &cal).unwrap();
    let df = schedule_to_dataframe(&scheduled, &cal).unwrap();
    assert_eq!(task_names(&df).unwrap(), vec!["Root", "Second", "First"]);

    let sorted = sort_chronologically(df).unwrap();
    assert_eq!(task_names(&sorted).unwrap(), vec!["Root", "First", "Second"]);
}
