use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const WEEK_ANCHOR_COUNT: usize = 52;

/// A Monday used to pre-mark a calendar view with its ISO week number.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekAnchor {
    pub date: NaiveDate,
    pub week_number: u32,
}

/// ISO-8601 week number (1-53). Weeks start on Monday and week 1 holds the
/// year's first Thursday, so late December can belong to week 1 of the next
/// year and early January to week 52/53 of the previous one.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// The ISO week-year paired with the week number.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

pub fn first_monday_of_year(year: i32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let days_to_monday = (7 - jan_first.weekday().num_days_from_monday()) % 7;
    jan_first.checked_add_signed(Duration::days(days_to_monday as i64))
}

/// 52 Mondays, one week apart, starting at the year's first Monday.
pub fn generate_week_anchors(year: i32) -> Vec<WeekAnchor> {
    let Some(first) = first_monday_of_year(year) else {
        return Vec::new();
    };

    (0..WEEK_ANCHOR_COUNT)
        .map_while(|week| first.checked_add_signed(Duration::weeks(week as i64)))
        .map(|date| WeekAnchor {
            date,
            week_number: iso_week_number(date),
        })
        .collect()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year.saturating_add(1), 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

pub fn is_meeting_weekday(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Tue | Weekday::Thu)
}
