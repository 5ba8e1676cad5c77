use crate::domain::model::Campaign;
use chrono::{NaiveTime, TimeDelta, Timelike};

/// The discrete start times a campaign can be booked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    slots: Vec<NaiveTime>,
}

impl SlotGrid {
    /// Walks from `start_time` in `interval` steps. A slot is kept only if it
    /// fully ends by `end_time`, and the walk stops once `max_appointments`
    /// slots exist. Campaigns that end at or before they start, or a
    /// non-positive interval, produce an empty grid.
    pub fn for_campaign(campaign: &Campaign, interval: TimeDelta) -> Self {
        let step = interval.num_seconds();
        if step <= 0 {
            return Self { slots: Vec::new() };
        }

        let start = i64::from(campaign.start_time.num_seconds_from_midnight());
        let end = i64::from(campaign.end_time.num_seconds_from_midnight());
        let capacity = campaign.max_appointments as usize;

        let mut slots = Vec::new();
        let mut cursor = start;
        while cursor + step <= end && slots.len() < capacity {
            // cursor < end <= 86_399, always a valid time of day
            if let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(cursor as u32, 0) {
                slots.push(time);
            }
            cursor += step;
        }

        Self { slots }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.slots.binary_search(&time).is_ok()
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn campaign(start: (u32, u32), end: (u32, u32), max_appointments: u32) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            title: "Jornada de castración".to_string(),
            location: "Parque central".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 7).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            max_appointments,
        }
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_grid_walks_in_fixed_steps() {
        let grid = SlotGrid::for_campaign(&campaign((8, 0), (10, 0), 50), TimeDelta::minutes(30));
        assert_eq!(grid.slots(), &[hm(8, 0), hm(8, 30), hm(9, 0), hm(9, 30)]);
        assert!(grid.contains(hm(9, 30)));
        assert!(!grid.contains(hm(10, 0)));
        assert!(!grid.contains(hm(8, 15)));
        assert!(!grid.contains(NaiveTime::from_hms_opt(8, 0, 1).unwrap()));
    }

    #[test]
    fn test_partial_trailing_slot_is_dropped() {
        let grid = SlotGrid::for_campaign(&campaign((8, 0), (9, 45), 50), TimeDelta::minutes(30));
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_max_appointments_caps_grid() {
        let grid = SlotGrid::for_campaign(&campaign((8, 0), (12, 0), 3), TimeDelta::minutes(30));
        assert_eq!(grid.slots(), &[hm(8, 0), hm(8, 30), hm(9, 0)]);
    }

    #[test]
    fn test_degenerate_campaigns_have_no_slots() {
        assert!(SlotGrid::for_campaign(&campaign((10, 0), (8, 0), 50), TimeDelta::minutes(30)).is_empty());
        assert!(SlotGrid::for_campaign(&campaign((8, 0), (8, 0), 50), TimeDelta::minutes(30)).is_empty());
        assert!(SlotGrid::for_campaign(&campaign((8, 0), (12, 0), 0), TimeDelta::minutes(30)).is_empty());
        assert!(SlotGrid::for_campaign(&campaign((8, 0), (12, 0), 50), TimeDelta::zero()).is_empty());
    }
}
