use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::meeting::MeetingOverride;
use crate::model::work_entry::{TimeOfDay, WorkEntries, WorkEntry};
use crate::repository::traits::KeyValueStore;
use crate::time::{format_date, parse_date};

pub const WORKING_HOURS_KEY: &str = "working_hours";
pub const MEETING_OVERRIDES_KEY: &str = "meeting_overrides";

/// Stored form of one day: unset times are empty strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
struct WorkingHoursRecord {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

impl From<&WorkEntry> for WorkingHoursRecord {
    fn from(entry: &WorkEntry) -> Self {
        Self {
            start: entry.start.map(|t| t.to_string()).unwrap_or_default(),
            end: entry.end.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

/// `{"YYYY-MM-DD": {"start": "HH:MM", "end": "HH:MM"}, ...}`
pub fn encode_entries(entries: &WorkEntries) -> Result<String> {
    let records: BTreeMap<String, WorkingHoursRecord> = entries
        .iter()
        .map(|(date, entry)| (format_date(*date), WorkingHoursRecord::from(entry)))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Lenient inverse of [`encode_entries`]. Keys that are not dates and values
/// that are not objects are skipped; a time that does not parse is unset.
pub fn decode_entries(content: &str) -> WorkEntries {
    let mut entries = WorkEntries::new();

    let root: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Discarding unreadable working hours: {}", e);
            return entries;
        }
    };
    let Value::Object(map) = root else {
        warn!("Discarding working hours: expected an object");
        return entries;
    };

    for (key, value) in map {
        let Some(date) = parse_date(&key) else {
            warn!("Skipping working hours with invalid date key '{}'", key);
            continue;
        };
        let Value::Object(fields) = value else {
            warn!("Skipping malformed working hours for {}", key);
            continue;
        };
        let time = |name: &str| -> Option<TimeOfDay> {
            match fields.get(name) {
                None | Some(Value::Null) => None,
                Some(Value::String(raw)) if raw.is_empty() => None,
                Some(Value::String(raw)) => {
                    let parsed = TimeOfDay::parse(raw);
                    if parsed.is_none() {
                        warn!("Ignoring invalid {} time '{}' on {}", name, raw, key);
                    }
                    parsed
                }
                Some(other) => {
                    warn!("Ignoring non-text {} time {} on {}", name, other, key);
                    None
                }
            }
        };
        entries.insert(date, WorkEntry::new(date, time("start"), time("end")));
    }

    entries
}

pub fn encode_overrides(overrides: &[MeetingOverride]) -> Result<String> {
    Ok(serde_json::to_string_pretty(overrides)?)
}

/// Unreadable records are skipped individually.
pub fn decode_overrides(content: &str) -> Vec<MeetingOverride> {
    let items: Vec<Value> = match serde_json::from_str(content) {
        Ok(items) => items,
        Err(e) => {
            warn!("Discarding unreadable meeting overrides: {}", e);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<MeetingOverride>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed meeting override: {}", e);
                None
            }
        })
        .collect()
}

/// Loads and saves timesheet state through a [`KeyValueStore`].
pub struct TimesheetRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TimesheetRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_entries(&self) -> Result<WorkEntries> {
        Ok(self
            .store
            .load(WORKING_HOURS_KEY)?
            .map(|content| decode_entries(&content))
            .unwrap_or_default())
    }

    pub fn save_entries(&self, entries: &WorkEntries) -> Result<()> {
        self.store.save(WORKING_HOURS_KEY, &encode_entries(entries)?)
    }

    pub fn load_overrides(&self) -> Result<Vec<MeetingOverride>> {
        Ok(self
            .store
            .load(MEETING_OVERRIDES_KEY)?
            .map(|content| decode_overrides(&content))
            .unwrap_or_default())
    }

    pub fn save_overrides(&self, overrides: &[MeetingOverride]) -> Result<()> {
        self.store.save(MEETING_OVERRIDES_KEY, &encode_overrides(overrides)?)
    }
}
