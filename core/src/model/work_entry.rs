use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const TIME_FORMAT: &str = "%H:%M";

/// Entries keyed by their date; iteration is ascending by date.
pub type WorkEntries = BTreeMap<NaiveDate, WorkEntry>;

/// A complete 24-hour `HH:MM` value, 00:00 through 23:59.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Accepts exactly five characters, `HH:MM`. Partial input is not a time.
    pub fn parse(input: &str) -> Option<Self> {
        let bytes = input.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return None;
        }
        if !bytes.iter().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit()) {
            return None;
        }
        NaiveTime::parse_from_str(input, TIME_FORMAT).ok().map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        (self.hour() * 60 + self.minute()) as i64
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Invalid time of day: '{}'", value))
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Working hours recorded for one calendar date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkEntry {
    pub date: NaiveDate,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

impl WorkEntry {
    pub fn new(date: NaiveDate, start: Option<TimeOfDay>, end: Option<TimeOfDay>) -> Self {
        Self { date, start, end }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, None, None)
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_of_day() {
        let t = TimeOfDay::parse("09:05").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));
        assert_eq!(t.minutes_since_midnight(), 545);
        assert_eq!(t.to_string(), "09:05");

        assert!(TimeOfDay::parse("23:59").is_some());
        assert!(TimeOfDay::parse("00:00").is_some());
        assert!(TimeOfDay::parse("24:00").is_none());
        assert!(TimeOfDay::parse("12:60").is_none());
        assert!(TimeOfDay::parse("9:05").is_none());
        assert!(TimeOfDay::parse("12:3").is_none());
        assert!(TimeOfDay::parse("+1:05").is_none());
        assert!(TimeOfDay::parse("").is_none());
    }

    #[test]
    fn test_time_of_day_serde_as_string() {
        let t = TimeOfDay::new(17, 30).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"17:30\"");
        let back: TimeOfDay = serde_json::from_str("\"17:30\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"17:3\"").is_err());
    }

    #[test]
    fn test_entry_completeness() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let nine = TimeOfDay::new(9, 0);
        assert!(!WorkEntry::empty(date).is_complete());
        assert!(!WorkEntry::new(date, nine, None).is_complete());
        assert!(WorkEntry::new(date, nine, TimeOfDay::new(17, 0)).is_complete());
    }
}
