use serde::{Deserialize, Serialize};

use crate::model::meeting::MeetingOccurrence;
use crate::model::summary::{MonthSummary, WeekSummary};
use crate::service::calendar_service::CalendarMarks;

/// Everything a display needs after a state change, computed in one pass.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub weeks: Vec<WeekSummary>,
    pub month: MonthSummary,
    pub meetings: Vec<MeetingOccurrence>,
    pub marked_dates: CalendarMarks,
}

impl Snapshot {
    /// Weeks rolled into the viewed month, in week order.
    pub fn weeks_in_month(&self) -> Vec<&WeekSummary> {
        self.weeks
            .iter()
            .filter(|week| week.month == self.month.month && week.year == self.month.year)
            .collect()
    }
}
