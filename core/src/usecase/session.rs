use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::input::sanitize_time;
use crate::model::work_entry::{WorkEntries, WorkEntry};
use crate::repository::timesheet::TimesheetRepository;
use crate::repository::traits::KeyValueStore;
use crate::service::aggregation_service::{aggregate_weeks, summarize_month};
use crate::service::calendar_service::build_marked_dates;
use crate::service::dto::Snapshot;
use crate::service::meeting_service::{MeetingBoard, MeetingOverrides, MeetingScheduler};
use crate::time::parse_date;

/// Everything one screen owns: the entries, the meeting list of the viewed
/// month, and any retained meeting overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub entries: WorkEntries,
    pub meetings: MeetingBoard,
    pub overrides: MeetingOverrides,
}

impl SessionState {
    pub fn viewed_month(&self) -> (i32, u32) {
        (self.meetings.year, self.meetings.month)
    }
}

/// Derives every view from the state. Pure: same state, same snapshot.
pub fn recompute(state: &SessionState, config: &EngineConfig) -> Snapshot {
    let (year, month) = state.viewed_month();
    let weeks = aggregate_weeks(&state.entries, config);
    let month_summary = summarize_month(&weeks, year, month, config.weekly_overtime_threshold);

    Snapshot {
        weeks,
        month: month_summary,
        meetings: state.meetings.occurrences.clone(),
        marked_dates: build_marked_dates(year, &state.entries),
    }
}

/// Command surface over a [`SessionState`]. Every command recomputes the
/// snapshot before returning. Persistence failures are logged and otherwise
/// ignored; memory stays the source of truth.
pub struct TimesheetSession<S: KeyValueStore> {
    repo: TimesheetRepository<S>,
    config: EngineConfig,
    scheduler: MeetingScheduler,
    state: SessionState,
    snapshot: Snapshot,
}

impl<S: KeyValueStore> TimesheetSession<S> {
    pub fn open(store: S, config: EngineConfig, year: i32, month: u32) -> Self {
        let repo = TimesheetRepository::new(store);
        let scheduler = MeetingScheduler::from_config(&config);

        let entries = repo.load_entries().unwrap_or_else(|e| {
            warn!("Failed to load working hours: {}", e);
            WorkEntries::new()
        });
        let overrides = if config.retain_meeting_overrides {
            repo.load_overrides()
                .map(MeetingOverrides::from_records)
                .unwrap_or_else(|e| {
                    warn!("Failed to load meeting overrides: {}", e);
                    MeetingOverrides::default()
                })
        } else {
            MeetingOverrides::default()
        };

        let mut meetings = MeetingBoard::generate(&scheduler, year, month);
        overrides.apply(&mut meetings.occurrences);

        let state = SessionState {
            entries,
            meetings,
            overrides,
        };
        let snapshot = recompute(&state, &config);
        info!(year, month, entries = state.entries.len(), "session opened");

        Self {
            repo,
            config,
            scheduler,
            state,
            snapshot,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// The stored entry for `date`, or an empty one to start editing from.
    pub fn select_day(&self, date: NaiveDate) -> WorkEntry {
        self.state
            .entries
            .get(&date)
            .cloned()
            .unwrap_or_else(|| WorkEntry::empty(date))
    }

    /// Sanitizes both raw inputs and stores them. Incomplete times are stored
    /// as unset.
    pub fn save_hours(&mut self, date: NaiveDate, start: &str, end: &str) -> WorkEntry {
        let entry = WorkEntry::new(date, sanitize_time(start), sanitize_time(end));
        info!(%date, complete = entry.is_complete(), "saving working hours");
        self.state.entries.insert(date, entry.clone());
        self.persist_entries();
        self.refresh();
        entry
    }

    /// Returns whether an entry existed.
    pub fn remove_hours(&mut self, date: NaiveDate) -> bool {
        let removed = self.state.entries.remove(&date).is_some();
        if removed {
            info!(%date, "removed working hours");
            self.persist_entries();
            self.refresh();
        }
        removed
    }

    /// Switches the viewed month and generates its meetings from scratch.
    /// Edits and cancellations survive only when overrides are retained.
    pub fn show_month(&mut self, year: i32, month: u32) {
        let mut meetings = MeetingBoard::generate(&self.scheduler, year, month);
        if self.config.retain_meeting_overrides {
            self.state.overrides.apply(&mut meetings.occurrences);
        }
        self.state.meetings = meetings;
        self.refresh();
    }

    /// Moves a meeting to the `YYYY-MM-DD` date given, whatever its weekday.
    pub fn edit_meeting(&mut self, id: &Uuid, new_date: &str) -> Result<()> {
        let date =
            parse_date(new_date).ok_or_else(|| anyhow!("Invalid meeting date: '{}'", new_date))?;
        let key = self.state.meetings.edit(id, date)?;
        info!(%id, %date, "meeting moved");

        if self.config.retain_meeting_overrides {
            self.state.overrides.record_edit(key, date);
            self.persist_overrides();
        }
        self.refresh();
        Ok(())
    }

    pub fn cancel_meeting(&mut self, id: &Uuid) -> Result<()> {
        let key = self.state.meetings.cancel(id)?;
        info!(%id, "meeting cancelled");

        if self.config.retain_meeting_overrides {
            self.state.overrides.record_cancel(key);
            self.persist_overrides();
        }
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.snapshot = recompute(&self.state, &self.config);
        debug!(weeks = self.snapshot.weeks.len(), "recomputed snapshot");
    }

    fn persist_entries(&self) {
        if let Err(e) = self.repo.save_entries(&self.state.entries) {
            warn!("Failed to save working hours: {}", e);
        }
    }

    fn persist_overrides(&self) {
        if let Err(e) = self.repo.save_overrides(&self.state.overrides.to_records()) {
            warn!("Failed to save meeting overrides: {}", e);
        }
    }
}
