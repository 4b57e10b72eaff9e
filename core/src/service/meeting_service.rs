use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{CycleAlignment, EngineConfig};
use crate::model::meeting::{CycleSlot, MeetingKey, MeetingOccurrence, MeetingOverride, Team};
use crate::time::{days_in_month, is_meeting_weekday};

const CYCLE_WEEKS: i64 = 4;

/// Four-week rotation: Thursday Team 1, Thursday Team 2, Tuesday Team 1,
/// Tuesday Team 2.
const ROTATION: [CycleSlot; 4] = [
    CycleSlot { weekday: Weekday::Thu, team: Team::Team1 },
    CycleSlot { weekday: Weekday::Thu, team: Team::Team2 },
    CycleSlot { weekday: Weekday::Tue, team: Team::Team1 },
    CycleSlot { weekday: Weekday::Tue, team: Team::Team2 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeetingScheduler {
    anchor: NaiveDate,
    alignment: CycleAlignment,
}

impl MeetingScheduler {
    /// `anchor` is moved forward to the first Thursday on or after it. An
    /// anchor too close to the end of the calendar is kept as given.
    pub fn new(anchor: NaiveDate, alignment: CycleAlignment) -> Self {
        let offset = (Weekday::Thu.num_days_from_monday() + 7
            - anchor.weekday().num_days_from_monday())
            % 7;
        let shifted = anchor.checked_add_signed(Duration::days(offset as i64));
        if shifted.is_none() {
            warn!(%anchor, "cycle anchor cannot be moved to a Thursday, using it as is");
        }
        Self {
            anchor: shifted.unwrap_or(anchor),
            alignment,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cycle_anchor, config.cycle_alignment)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Index 0-3 into the rotation. Dates before the anchor continue the
    /// cycle backwards.
    pub fn cycle_position(&self, date: NaiveDate) -> usize {
        let origin = match self.alignment {
            CycleAlignment::AnchorDay => self.anchor,
            CycleAlignment::IsoWeek => self
                .anchor
                .checked_sub_signed(Duration::days(
                    self.anchor.weekday().num_days_from_monday() as i64,
                ))
                .unwrap_or(self.anchor),
        };
        let days = (date - origin).num_days();
        days.div_euclid(7).rem_euclid(CYCLE_WEEKS) as usize
    }

    pub fn slot_for(&self, date: NaiveDate) -> CycleSlot {
        ROTATION[self.cycle_position(date)]
    }

    /// The team meeting on `date`, if the rotation puts one there.
    pub fn team_on(&self, date: NaiveDate) -> Option<Team> {
        let weekday = date.weekday();
        if !is_meeting_weekday(weekday) {
            return None;
        }
        let slot = self.slot_for(date);
        (slot.weekday == weekday).then_some(slot.team)
    }

    /// Freshly generated occurrences for one month, ascending by date. Ids are
    /// new on every call.
    pub fn occurrences_for_month(&self, year: i32, month: u32) -> Vec<MeetingOccurrence> {
        let occurrences: Vec<MeetingOccurrence> = (1..=days_in_month(year, month))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .filter_map(|date| self.team_on(date).map(|team| MeetingOccurrence::new(date, team)))
            .collect();

        debug!(year, month, count = occurrences.len(), "generated meetings");
        occurrences
    }
}

/// Edits and cancellations keyed by generated identity, so they can be
/// re-applied when a month is generated again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingOverrides {
    by_key: BTreeMap<MeetingKey, MeetingOverride>,
}

impl MeetingOverrides {
    pub fn from_records(records: Vec<MeetingOverride>) -> Self {
        Self {
            by_key: records.into_iter().map(|r| (r.key(), r)).collect(),
        }
    }

    pub fn to_records(&self) -> Vec<MeetingOverride> {
        self.by_key.values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn get(&self, key: &MeetingKey) -> Option<&MeetingOverride> {
        self.by_key.get(key)
    }

    pub fn record_edit(&mut self, key: MeetingKey, date: NaiveDate) {
        self.by_key.entry(key).or_insert_with(|| MeetingOverride::new(key)).date = Some(date);
    }

    pub fn record_cancel(&mut self, key: MeetingKey) {
        self.by_key.entry(key).or_insert_with(|| MeetingOverride::new(key)).cancelled = true;
    }

    pub fn apply(&self, occurrences: &mut [MeetingOccurrence]) {
        for occurrence in occurrences.iter_mut() {
            if let Some(ov) = self.by_key.get(&occurrence.key()) {
                ov.apply(occurrence);
            }
        }
    }
}

/// The meeting list shown for one month, with in-place edits.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingBoard {
    pub year: i32,
    pub month: u32,
    pub occurrences: Vec<MeetingOccurrence>,
}

impl MeetingBoard {
    pub fn generate(scheduler: &MeetingScheduler, year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            occurrences: scheduler.occurrences_for_month(year, month),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<&MeetingOccurrence> {
        self.occurrences.iter().find(|o| o.id == *id)
    }

    /// Moves an occurrence to `date` without checking it against the rotation.
    pub fn edit(&mut self, id: &Uuid, date: NaiveDate) -> Result<MeetingKey> {
        let occurrence = self.find_mut(id)?;
        occurrence.date = date;
        Ok(occurrence.key())
    }

    /// Marks an occurrence cancelled; it stays in the list.
    pub fn cancel(&mut self, id: &Uuid) -> Result<MeetingKey> {
        let occurrence = self.find_mut(id)?;
        occurrence.is_cancelled = true;
        Ok(occurrence.key())
    }

    fn find_mut(&mut self, id: &Uuid) -> Result<&mut MeetingOccurrence> {
        self.occurrences
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| anyhow!("Meeting with ID {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduler(alignment: CycleAlignment) -> MeetingScheduler {
        MeetingScheduler::new(date(2025, 1, 2), alignment)
    }

    fn summary(occurrences: &[MeetingOccurrence]) -> Vec<(NaiveDate, Team)> {
        occurrences.iter().map(|o| (o.date, o.team)).collect()
    }

    #[test]
    fn test_anchor_moves_to_thursday() {
        assert_eq!(scheduler(CycleAlignment::AnchorDay).anchor(), date(2025, 1, 2));
        let s = MeetingScheduler::new(date(2024, 12, 31), CycleAlignment::AnchorDay);
        assert_eq!(s.anchor(), date(2025, 1, 2));
        let s = MeetingScheduler::new(date(2025, 1, 3), CycleAlignment::AnchorDay);
        assert_eq!(s.anchor(), date(2025, 1, 9));
    }

    #[test]
    fn test_anchor_at_end_of_calendar_does_not_panic() {
        // Monday; the following Thursday is past the last representable date.
        let last = NaiveDate::MAX;
        assert_ne!(last.weekday(), Weekday::Thu);

        let s = MeetingScheduler::new(last, CycleAlignment::AnchorDay);
        assert_eq!(s.anchor(), last);
        assert_eq!(s.cycle_position(last), 0);

        let s = MeetingScheduler::new(last, CycleAlignment::IsoWeek);
        assert!(s.cycle_position(last) < 4);
    }

    #[test]
    fn test_anchor_from_config_at_end_of_calendar() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"cycle_anchor": "+262142-12-31"}"#).unwrap();
        let s = MeetingScheduler::from_config(&config);
        assert_eq!(s.anchor(), config.cycle_anchor);
    }

    #[test]
    fn test_cycle_position() {
        let s = scheduler(CycleAlignment::AnchorDay);
        assert_eq!(s.cycle_position(date(2025, 1, 2)), 0);
        assert_eq!(s.cycle_position(date(2025, 1, 8)), 0);
        assert_eq!(s.cycle_position(date(2025, 1, 9)), 1);
        assert_eq!(s.cycle_position(date(2025, 1, 14)), 1);
        assert_eq!(s.cycle_position(date(2025, 1, 21)), 2);
        assert_eq!(s.cycle_position(date(2025, 1, 28)), 3);
        assert_eq!(s.cycle_position(date(2025, 1, 30)), 0);
        assert_eq!(s.cycle_position(date(2025, 1, 1)), 3);
    }

    #[test]
    fn test_january_2025_anchor_day_rotation() {
        let meetings = scheduler(CycleAlignment::AnchorDay).occurrences_for_month(2025, 1);
        assert_eq!(
            summary(&meetings),
            vec![
                (date(2025, 1, 2), Team::Team1),
                (date(2025, 1, 9), Team::Team2),
                (date(2025, 1, 21), Team::Team1),
                (date(2025, 1, 28), Team::Team2),
                (date(2025, 1, 30), Team::Team1),
            ]
        );
        assert!(meetings.iter().all(|m| !m.is_cancelled && m.date == m.scheduled_date));
    }

    #[test]
    fn test_january_2025_iso_week_rotation() {
        let s = scheduler(CycleAlignment::IsoWeek);
        assert_eq!(s.cycle_position(date(2025, 1, 14)), 2);

        let meetings = s.occurrences_for_month(2025, 1);
        assert_eq!(
            summary(&meetings),
            vec![
                (date(2025, 1, 2), Team::Team1),
                (date(2025, 1, 9), Team::Team2),
                (date(2025, 1, 14), Team::Team1),
                (date(2025, 1, 21), Team::Team2),
                (date(2025, 1, 30), Team::Team1),
            ]
        );
    }

    #[test]
    fn test_rotation_extends_before_anchor() {
        let meetings = scheduler(CycleAlignment::AnchorDay).occurrences_for_month(2024, 12);
        assert_eq!(
            summary(&meetings),
            vec![
                (date(2024, 12, 3), Team::Team2),
                (date(2024, 12, 5), Team::Team1),
                (date(2024, 12, 12), Team::Team2),
                (date(2024, 12, 24), Team::Team1),
                (date(2024, 12, 31), Team::Team2),
            ]
        );
    }

    #[test]
    fn test_every_meeting_matches_its_slot() {
        let s = scheduler(CycleAlignment::AnchorDay);
        for month in 1..=12 {
            let meetings = s.occurrences_for_month(2025, month);
            assert!(meetings.windows(2).all(|w| w[0].date < w[1].date));
            for m in &meetings {
                let slot = s.slot_for(m.date);
                assert_eq!(slot.weekday, m.date.weekday());
                assert_eq!(slot.team, m.team);
            }
        }
    }

    #[test]
    fn test_regeneration_produces_new_ids() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let first = s.occurrences_for_month(2025, 2);
        let second = s.occurrences_for_month(2025, 2);
        assert_eq!(summary(&first), summary(&second));
        assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
    }

    #[test]
    fn test_edit_accepts_any_date() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let mut board = MeetingBoard::generate(&s, 2025, 1);
        let id = board.occurrences[0].id;

        // A Saturday, outside the rotation.
        let key = board.edit(&id, date(2025, 1, 4)).unwrap();
        assert_eq!(key, MeetingKey { scheduled_date: date(2025, 1, 2), team: Team::Team1 });
        assert_eq!(board.get(&id).unwrap().date, date(2025, 1, 4));
        assert_eq!(board.occurrences[0].id, id);
    }

    #[test]
    fn test_cancel_keeps_the_slot() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let mut board = MeetingBoard::generate(&s, 2025, 1);
        let id = board.occurrences[1].id;

        board.cancel(&id).unwrap();
        assert_eq!(board.occurrences.len(), 5);
        assert!(board.occurrences[1].is_cancelled);
        assert_eq!(board.occurrences.iter().filter(|o| o.is_cancelled).count(), 1);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let mut board = MeetingBoard::generate(&s, 2025, 1);
        let before = board.clone();
        assert!(board.cancel(&Uuid::new_v4()).is_err());
        assert!(board.edit(&Uuid::new_v4(), date(2025, 1, 5)).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_cancellation_lost_on_regeneration() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let mut board = MeetingBoard::generate(&s, 2025, 1);
        let id = board.occurrences[0].id;
        board.cancel(&id).unwrap();

        let regenerated = MeetingBoard::generate(&s, 2025, 1);
        assert!(regenerated.occurrences.iter().all(|o| !o.is_cancelled));
        assert!(regenerated.get(&id).is_none());
    }

    #[test]
    fn test_overrides_reapply_after_regeneration() {
        let s = scheduler(CycleAlignment::AnchorDay);
        let mut board = MeetingBoard::generate(&s, 2025, 1);
        let mut overrides = MeetingOverrides::default();

        let cancelled_id = board.occurrences[0].id;
        let cancelled = board.cancel(&cancelled_id).unwrap();
        overrides.record_cancel(cancelled);
        let moved_id = board.occurrences[2].id;
        let moved = board.edit(&moved_id, date(2025, 1, 22)).unwrap();
        overrides.record_edit(moved, date(2025, 1, 22));

        let mut regenerated = MeetingBoard::generate(&s, 2025, 1);
        overrides.apply(&mut regenerated.occurrences);

        assert!(regenerated.occurrences[0].is_cancelled);
        assert_eq!(regenerated.occurrences[2].date, date(2025, 1, 22));
        assert_eq!(regenerated.occurrences[2].scheduled_date, date(2025, 1, 21));
        assert!(!regenerated.occurrences[1].is_cancelled);

        let restored = MeetingOverrides::from_records(overrides.to_records());
        assert_eq!(restored, overrides);
    }
}
