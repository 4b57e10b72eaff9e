pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{CycleAlignment, EngineConfig, OvernightPolicy, WeekKeying};
pub use input::{format_time_input, sanitize_time};
pub use model::meeting::{MeetingOccurrence, Team};
pub use model::summary::{MonthSummary, WeekSummary};
pub use model::work_entry::{TimeOfDay, WorkEntries, WorkEntry};
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryStore, TimesheetRepository};
pub use service::aggregation_service::{aggregate_weeks, summarize_month};
pub use service::calendar_service::{build_marked_dates, CalendarMarks, MarkedDate, StyleHint};
pub use service::dto::Snapshot;
pub use service::hours_service::calculate_hours;
pub use service::meeting_service::{MeetingBoard, MeetingOverrides, MeetingScheduler};
pub use time::{first_monday_of_year, format_date, generate_week_anchors, iso_week_number, parse_date};
pub use usecase::session::{recompute, SessionState, TimesheetSession};
