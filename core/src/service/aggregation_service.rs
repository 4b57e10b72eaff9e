use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::config::{EngineConfig, WeekKeying};
use crate::model::summary::{overtime, MonthSummary, WeekSummary};
use crate::model::work_entry::WorkEntries;
use crate::service::hours_service::entry_hours;
use crate::time::iso_week_key;

/// Folds complete entries into ISO week buckets, ascending by week.
///
/// Entries missing a start or end time are skipped. A bucket's `month` and
/// `year` come from its earliest date, which is the entry that opened it since
/// entries are visited in date order.
pub fn aggregate_weeks(entries: &WorkEntries, config: &EngineConfig) -> Vec<WeekSummary> {
    let mut buckets: BTreeMap<(i32, u32), WeekSummary> = BTreeMap::new();

    for (date, entry) in entries {
        let Some(hours) = entry_hours(entry, config.overnight) else {
            continue;
        };

        let (iso_year, week_number) = iso_week_key(*date);
        let key = match config.week_keying {
            WeekKeying::IsoYearAndWeek => (iso_year, week_number),
            WeekKeying::WeekNumberOnly => (0, week_number),
        };

        let bucket = buckets.entry(key).or_insert_with(|| WeekSummary {
            week_number,
            iso_year,
            total_hours: 0.0,
            overtime_hours: 0.0,
            dates: Vec::new(),
            month: date.month(),
            year: date.year(),
        });
        bucket.total_hours += hours;
        bucket.dates.push(*date);
    }

    let weeks: Vec<WeekSummary> = buckets
        .into_values()
        .map(|mut week| {
            week.overtime_hours = overtime(week.total_hours, config.weekly_overtime_threshold);
            week
        })
        .collect();

    debug!(entries = entries.len(), weeks = weeks.len(), "aggregated weeks");
    weeks
}

/// Rolls up the weeks whose first date falls in `year`/`month`. A week that
/// straddles a month boundary counts wholly toward the month it starts in.
pub fn summarize_month(
    weeks: &[WeekSummary],
    year: i32,
    month: u32,
    weekly_threshold: f64,
) -> MonthSummary {
    let in_month: Vec<&WeekSummary> = weeks
        .iter()
        .filter(|week| {
            week.first_date()
                .is_some_and(|first| first.year() == year && first.month() == month)
        })
        .collect();

    let total_hours: f64 = in_month.iter().map(|week| week.total_hours).sum();
    let threshold = weekly_threshold * in_month.len() as f64;

    MonthSummary {
        year,
        month,
        total_hours,
        overtime_hours: overtime(total_hours, threshold),
        week_numbers: in_month.iter().map(|week| week.week_number).collect(),
    }
}
