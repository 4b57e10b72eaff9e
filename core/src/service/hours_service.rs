use crate::config::OvernightPolicy;
use crate::model::work_entry::{TimeOfDay, WorkEntry};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Worked hours between `start` and `end` on one date, or `None` when either
/// side is missing. Under `PassThrough` an end before the start yields a
/// negative result.
pub fn calculate_hours(
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    policy: OvernightPolicy,
) -> Option<f64> {
    let (start, end) = (start?, end?);
    let mut minutes = end.minutes_since_midnight() - start.minutes_since_midnight();
    if minutes < 0 && policy == OvernightPolicy::WrapToNextDay {
        minutes += MINUTES_PER_DAY;
    }
    Some(minutes as f64 / 60.0)
}

pub fn entry_hours(entry: &WorkEntry, policy: OvernightPolicy) -> Option<f64> {
    calculate_hours(entry.start, entry.end, policy)
}
