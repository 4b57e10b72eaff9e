use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    Team1,
    Team2,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Team1 => write!(f, "Team 1"),
            Team::Team2 => write!(f, "Team 2"),
        }
    }
}

/// One slot of the four-week rotation: who meets, and on which weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSlot {
    pub weekday: Weekday,
    pub team: Team,
}

/// Identity of a generated occurrence, independent of later edits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeetingKey {
    pub scheduled_date: NaiveDate,
    pub team: Team,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeetingOccurrence {
    /// Fresh for every generation of a month.
    pub id: Uuid,
    pub date: NaiveDate,
    pub team: Team,
    pub is_cancelled: bool,
    /// Date the rotation produced; `date` may differ after an edit.
    pub scheduled_date: NaiveDate,
}

impl MeetingOccurrence {
    pub fn new(date: NaiveDate, team: Team) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            team,
            is_cancelled: false,
            scheduled_date: date,
        }
    }

    pub fn key(&self) -> MeetingKey {
        MeetingKey {
            scheduled_date: self.scheduled_date,
            team: self.team,
        }
    }
}

/// A user change to one generated occurrence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeetingOverride {
    pub scheduled_date: NaiveDate,
    pub team: Team,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub cancelled: bool,
}

impl MeetingOverride {
    pub fn new(key: MeetingKey) -> Self {
        Self {
            scheduled_date: key.scheduled_date,
            team: key.team,
            date: None,
            cancelled: false,
        }
    }

    pub fn key(&self) -> MeetingKey {
        MeetingKey {
            scheduled_date: self.scheduled_date,
            team: self.team,
        }
    }

    pub fn apply(&self, occurrence: &mut MeetingOccurrence) {
        if let Some(date) = self.date {
            occurrence.date = date;
        }
        if self.cancelled {
            occurrence.is_cancelled = true;
        }
    }
}
