use chrono::NaiveDate;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use timeline_scheduler::calendar::{
    HolidayFileError, SharedCalendar, WorkCalendar, load_holidays_yaml, parse_holidays_yaml,
};
use timeline_scheduler::{TaskSpec, schedule};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn parses_keyed_document() {
    let dates = parse_holidays_yaml("holidays:\n  - 2024-09-16\n  - \"2024-09-23\"\n").unwrap();
    assert_eq!(dates, vec![d(2024, 9, 16), d(2024, 9, 23)]);
}

#[test]
fn parses_bare_list_and_skips_blanks() {
    let dates = parse_holidays_yaml("- 2024-07-15\n- \"\"\n- \" 2024-12-25 \"\n").unwrap();
    assert_eq!(dates, vec![d(2024, 7, 15), d(2024, 12, 25)]);
}

#[test]
fn invalid_entry_names_the_value() {
    let err = parse_holidays_yaml("holidays:\n  - 2024-13-40\n").unwrap_err();
    match err {
        HolidayFileError::InvalidDate { value, .. } => assert_eq!(value, "2024-13-40"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_shape_is_a_decode_error() {
    let err = parse_holidays_yaml("holidays: 2024-07-15\n").unwrap_err();
    assert!(matches!(err, HolidayFileError::Decode(_)));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = load_holidays_yaml(&path).unwrap_err();
    assert!(matches!(err, HolidayFileError::Read { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn calendar_from_holiday_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.yaml");
    fs::write(&path, "holidays:\n  - 2024-07-15\n").unwrap();

    let cal = WorkCalendar::with_holiday_file(&path).unwrap();
    assert!(!cal.is_workday(d(2024, 7, 15)));
    assert!(cal.is_workday(d(2024, 7, 16)));
}

#[test]
fn shared_calendar_reload_swaps_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.yaml");
    fs::write(&path, "- 2024-07-15\n").unwrap();

    let shared = SharedCalendar::default();
    let before = shared.snapshot();
    assert_eq!(shared.reload_holidays(&path).unwrap(), 1);
    let after = shared.snapshot();

    // The snapshot taken earlier is untouched by the reload
    assert!(before.is_workday(d(2024, 7, 15)));
    assert!(!after.is_workday(d(2024, 7, 15)));
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn failed_reload_keeps_current_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.yaml");
    fs::write(&path, "- not-a-date\n").unwrap();

    let shared = SharedCalendar::new(WorkCalendar::with_holidays([d(2024, 7, 15)]));
    assert!(shared.reload_holidays(&path).is_err());
    assert_eq!(shared.snapshot().holidays(), vec![d(2024, 7, 15)]);
}

#[test]
fn reconfiguring_between_runs_changes_dates() {
    let shared = SharedCalendar::default();
    let tasks = || {
        vec![
            TaskSpec::new("Survey").with_start(d(2024, 7, 12)).with_duration(2),
        ]
    };

    let first = schedule(tasks(), &shared.snapshot()).unwrap();
    assert_eq!(first[0].computed_end, d(2024, 7, 15));

    shared.set_holidays([d(2024, 7, 15)]);
    let second = schedule(tasks(), &shared.snapshot()).unwrap();
    assert_eq!(second[0].computed_end, d(2024, 7, 16));

    shared.set_all_workdays(true);
    let third = schedule(tasks(), &shared.snapshot()).unwrap();
    assert_eq!(third[0].computed_end, d(2024, 7, 13));
}

#[test]
fn shared_calendar_serves_concurrent_readers() {
    let shared = SharedCalendar::default();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let tasks = vec![TaskSpec::new("Survey").with_start(d(2024, 7, 12)).with_duration(2)];
                schedule(tasks, &shared.snapshot()).unwrap()[0].computed_end
            })
        })
        .collect();
    shared.set_holidays([d(2024, 12, 25)]);
    for handle in handles {
        assert_eq!(handle.join().unwrap(), d(2024, 7, 15));
    }
}

#[test]
fn empty_and_comment_only_documents_mean_no_holidays() {
    assert_eq!(parse_holidays_yaml("").unwrap(), Vec::<NaiveDate>::new());
    assert_eq!(
        parse_holidays_yaml("# no holidays this year\n").unwrap(),
        Vec::<NaiveDate>::new()
    );
}

#[test]
fn null_holidays_key_is_a_decode_error() {
    let err = parse_holidays_yaml("holidays:\n").unwrap_err();
    assert!(matches!(err, HolidayFileError::Decode(_)));
}

#[test]
fn reload_of_cleared_file_drops_holidays() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.yaml");
    fs::write(&path, "# cleared\n").unwrap();

    let shared = SharedCalendar::new(WorkCalendar::with_holidays([d(2024, 7, 15)]));
    assert_eq!(shared.reload_holidays(&path).unwrap(), 0);
    assert!(shared.snapshot().holidays().is_empty());
    assert!(shared.snapshot().is_workday(d(2024, 7, 15)));
}
