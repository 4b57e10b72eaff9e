use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::work_entry::WorkEntries;
use crate::time::generate_week_anchors;

/// Week number shown for a date the decoration knows nothing about.
pub const PLACEHOLDER_WEEK_NUMBER: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleHint {
    WeekStart,
    WorkingHours,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MarkedDate {
    pub week_number: Option<u32>,
    pub hint: StyleHint,
}

/// Date to style-hint mapping consumed by a calendar view.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarMarks {
    pub marks: BTreeMap<NaiveDate, MarkedDate>,
}

impl CalendarMarks {
    pub fn get(&self, date: NaiveDate) -> Option<&MarkedDate> {
        self.marks.get(&date)
    }

    pub fn week_number_for(&self, date: NaiveDate) -> u32 {
        self.marks
            .get(&date)
            .and_then(|mark| mark.week_number)
            .unwrap_or(PLACEHOLDER_WEEK_NUMBER)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Marks the year's week anchors, then every date that has an entry. An entry
/// date keeps the week number of an anchor on the same day.
pub fn build_marked_dates(year: i32, entries: &WorkEntries) -> CalendarMarks {
    let mut marks: BTreeMap<NaiveDate, MarkedDate> = generate_week_anchors(year)
        .into_iter()
        .map(|anchor| {
            (
                anchor.date,
                MarkedDate {
                    week_number: Some(anchor.week_number),
                    hint: StyleHint::WeekStart,
                },
            )
        })
        .collect();

    for date in entries.keys() {
        let week_number = marks.get(date).and_then(|mark| mark.week_number);
        marks.insert(
            *date,
            MarkedDate {
                week_number,
                hint: StyleHint::WorkingHours,
            },
        );
    }

    CalendarMarks { marks }
}
