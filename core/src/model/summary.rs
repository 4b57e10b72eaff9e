use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hours folded into one ISO week bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub week_number: u32,
    /// ISO week-year of the bucket. Under week-number-only keying this is the
    /// week-year of the bucket's first date.
    pub iso_year: i32,
    pub total_hours: f64,
    pub overtime_hours: f64,
    /// Contributing dates, ascending.
    pub dates: Vec<NaiveDate>,
    /// Calendar month and year of the first contributing date.
    pub month: u32,
    pub year: i32,
}

impl WeekSummary {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub total_hours: f64,
    pub overtime_hours: f64,
    pub week_numbers: Vec<u32>,
}

impl MonthSummary {
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            total_hours: 0.0,
            overtime_hours: 0.0,
            week_numbers: Vec::new(),
        }
    }

    pub fn week_count(&self) -> usize {
        self.week_numbers.len()
    }
}

pub fn overtime(total_hours: f64, threshold: f64) -> f64 {
    (total_hours - threshold).max(0.0)
}
