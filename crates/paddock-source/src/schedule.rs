//! Season schedule assembly.
//!
//! The upstream lists meetings without championship round numbers. Rounds
//! are assigned here by start date: testing meetings are round `0`, every
//! other meeting takes the next round in order.

use paddock_types::Event;

use crate::model::Meeting;

/// A meeting together with its derived round number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// The upstream meeting row.
    pub meeting: Meeting,
    /// Championship round; `0` for testing.
    pub round: u32,
}

impl ScheduleEntry {
    /// Display name used for event lookups.
    pub fn event_name(&self) -> &str {
        &self.meeting.meeting_name
    }

    /// Project to the public [`Event`] shape.
    pub fn to_event(&self) -> Event {
        Event {
            event_name: self.meeting.meeting_name.clone(),
            round_number: self.round,
        }
    }
}

/// Order meetings by start date and number the rounds.
pub fn build_schedule(mut meetings: Vec<Meeting>) -> Vec<ScheduleEntry> {
    meetings.sort_by(|a, b| {
        a.date_start
            .cmp(&b.date_start)
            .then(a.meeting_key.cmp(&b.meeting_key))
    });

    let mut round: u32 = 0;
    meetings
        .into_iter()
        .map(|meeting| {
            let assigned = if meeting.is_testing() {
                0
            } else {
                round = round.saturating_add(1);
                round
            };
            ScheduleEntry {
                meeting,
                round: assigned,
            }
        })
        .collect()
}

/// Find the first entry whose event name equals `name` exactly.
pub fn find_event<'a>(schedule: &'a [ScheduleEntry], name: &str) -> Option<&'a ScheduleEntry> {
    schedule.iter().find(|entry| entry.event_name() == name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn meeting(key: u32, name: &str, start: &str) -> Meeting {
        Meeting {
            meeting_key: key,
            meeting_name: name.to_owned(),
            meeting_official_name: None,
            country_name: None,
            location: None,
            circuit_short_name: None,
            date_start: start.parse::<DateTime<Utc>>().unwrap(),
            year: 2023,
        }
    }

    #[test]
    fn testing_is_round_zero_and_races_count_from_one() {
        let schedule = build_schedule(vec![
            meeting(1142, "Saudi Arabian Grand Prix", "2023-03-17T13:30:00Z"),
            meeting(1140, "Pre-Season Testing", "2023-02-23T07:00:00Z"),
            meeting(1141, "Bahrain Grand Prix", "2023-03-03T11:30:00Z"),
        ]);

        let rounds: Vec<(&str, u32)> = schedule
            .iter()
            .map(|e| (e.event_name(), e.round))
            .collect();
        assert_eq!(
            rounds,
            vec![
                ("Pre-Season Testing", 0),
                ("Bahrain Grand Prix", 1),
                ("Saudi Arabian Grand Prix", 2),
            ]
        );
    }

    #[test]
    fn mid_season_test_does_not_consume_a_round() {
        let schedule = build_schedule(vec![
            meeting(1, "Bahrain Grand Prix", "2020-03-01T00:00:00Z"),
            meeting(2, "Barcelona Testing", "2020-03-10T00:00:00Z"),
            meeting(3, "Australian Grand Prix", "2020-03-20T00:00:00Z"),
        ]);
        assert_eq!(schedule.get(2).map(|e| e.round), Some(2));
        assert_eq!(schedule.get(1).map(|e| e.round), Some(0));
    }

    #[test]
    fn find_is_exact_match() {
        let schedule = build_schedule(vec![meeting(
            1141,
            "Bahrain Grand Prix",
            "2023-03-03T11:30:00Z",
        )]);
        assert!(find_event(&schedule, "Bahrain Grand Prix").is_some());
        assert!(find_event(&schedule, "bahrain grand prix").is_none());
        assert!(find_event(&schedule, "Bahrain").is_none());
    }

    #[test]
    fn to_event_shape() {
        let entry = ScheduleEntry {
            meeting: meeting(1141, "Bahrain Grand Prix", "2023-03-03T11:30:00Z"),
            round: 1,
        };
        let event = entry.to_event();
        assert_eq!(event.event_name, "Bahrain Grand Prix");
        assert_eq!(event.round_number, 1);
    }
}
