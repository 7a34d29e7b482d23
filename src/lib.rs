pub mod calculations;
pub mod calendar;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod scheduler;
pub mod table;
pub mod task;
pub mod validation;

pub use calendar::{
    CalendarError, CivilDay, HolidayFileError, SharedCalendar, WorkCalendar, WorkCalendarConfig,
    load_holidays_yaml, normalize_to_day, parse_holidays_yaml,
};
pub use error::{ActualError, ScheduleError};
pub use persistence::{
    PersistenceError, ScheduleSnapshot, load_schedule_from_json, read_tasks, read_tasks_from_csv,
    save_schedule_to_csv, save_schedule_to_json,
};
pub use scheduler::{Scheduler, schedule};
pub use table::{schedule_to_dataframe, sort_chronologically, task_names};
pub use task::{ActualSpec, ActualWindow, ScheduledTask, TaskSpec};
pub use validation::{ValidationError, validate_task, validate_tasks};
