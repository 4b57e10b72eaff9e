use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_NAME: &str = ".timesheet";

/// How entries are bucketed into weeks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekKeying {
    /// ISO week-year plus week number.
    #[default]
    IsoYearAndWeek,
    /// Week number alone; the same week number in different years merges.
    WeekNumberOnly,
}

/// What to do when a day's end time is earlier than its start time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OvernightPolicy {
    /// Keep the negative duration.
    #[default]
    PassThrough,
    /// Treat the end time as belonging to the next day.
    WrapToNextDay,
}

/// Where the four-week meeting rotation starts counting weeks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleAlignment {
    /// Whole seven-day spans since the Thursday anchor.
    #[default]
    AnchorDay,
    /// Whole Monday-based weeks since the week holding the anchor.
    IsoWeek,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub weekly_overtime_threshold: f64,
    pub week_keying: WeekKeying,
    pub overnight: OvernightPolicy,
    pub cycle_anchor: NaiveDate,
    pub cycle_alignment: CycleAlignment,
    pub retain_meeting_overrides: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weekly_overtime_threshold: 30.0,
            week_keying: WeekKeying::default(),
            overnight: OvernightPolicy::default(),
            cycle_anchor: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default(),
            cycle_alignment: CycleAlignment::default(),
            retain_meeting_overrides: false,
        }
    }
}

impl EngineConfig {
    /// Reads `config.json` from the data directory. A missing file means defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }
}

/// The given directory, or `~/.timesheet`.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir =
                dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(DATA_DIR_NAME))
        }
    }
}
