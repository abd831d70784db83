//! In-memory provider for tests.
//!
//! [`FixtureProvider`] serves a small, deterministic 2023 season: a
//! pre-season test, the Bahrain Grand Prix (race data present), and the
//! Saudi Arabian Grand Prix (no race session). Rows can be replaced
//! per test through the public fields.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use paddock_types::DriverNumber;

use crate::error::SourceError;
use crate::model::{Driver, Lap, LocationSample, Meeting, Session, TimeWindow};
use crate::provider::TelemetryProvider;

/// Year the fixture season belongs to.
pub const FIXTURE_YEAR: i32 = 2023;
/// Event with a complete race session.
pub const FIXTURE_EVENT: &str = "Bahrain Grand Prix";
/// Event whose meeting has no race session.
pub const FIXTURE_EVENT_WITHOUT_RACE: &str = "Saudi Arabian Grand Prix";
/// Session key of the fixture race.
pub const FIXTURE_SESSION_KEY: u32 = 7953;

/// Deterministic in-memory [`TelemetryProvider`].
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    /// Meetings by season.
    pub meetings: BTreeMap<i32, Vec<Meeting>>,
    /// Sessions by meeting key.
    pub sessions: BTreeMap<u32, Vec<Session>>,
    /// Drivers by session key.
    pub drivers: BTreeMap<u32, Vec<Driver>>,
    /// Laps by session key.
    pub laps: BTreeMap<u32, Vec<Lap>>,
    /// Position samples by session key.
    pub locations: BTreeMap<u32, Vec<LocationSample>>,
    /// When set, every call fails with an upstream status error.
    pub fail_with_status: Option<u16>,
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().unwrap_or_default()
}

fn meeting(key: u32, name: &str, start: &str) -> Meeting {
    Meeting {
        meeting_key: key,
        meeting_name: name.to_owned(),
        meeting_official_name: None,
        country_name: None,
        location: None,
        circuit_short_name: None,
        date_start: at(start),
        year: FIXTURE_YEAR,
    }
}

fn driver(number: u32, acronym: Option<&str>) -> Driver {
    Driver {
        driver_number: DriverNumber(number),
        name_acronym: acronym.map(ToOwned::to_owned),
        full_name: None,
        team_name: None,
    }
}

/// Four samples per driver, one per second from `start`, on a square.
fn square_lap(number: u32, start: DateTime<Utc>, offset: f64) -> Vec<LocationSample> {
    let corners = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
    let mut at_time = start;
    corners
        .iter()
        .map(|&(x, y)| {
            let sample = LocationSample {
                driver_number: DriverNumber(number),
                date: at_time,
                x: x + offset,
                y: y + offset,
                z: 0.0,
            };
            at_time = at_time
                .checked_add_signed(TimeDelta::seconds(1))
                .unwrap_or(at_time);
            sample
        })
        .collect()
}

impl Default for FixtureProvider {
    fn default() -> Self {
        let race_start = at("2023-03-05T15:00:00Z");
        let lap_start = at("2023-03-05T15:10:00Z");

        let mut meetings = BTreeMap::new();
        meetings.insert(
            FIXTURE_YEAR,
            vec![
                meeting(1142, FIXTURE_EVENT_WITHOUT_RACE, "2023-03-17T13:30:00Z"),
                meeting(1141, FIXTURE_EVENT, "2023-03-03T11:30:00Z"),
                meeting(1140, "Pre-Season Testing", "2023-02-23T07:00:00Z"),
            ],
        );

        let mut sessions = BTreeMap::new();
        sessions.insert(
            1141,
            vec![
                Session {
                    session_key: 7779,
                    meeting_key: 1141,
                    session_name: String::from("Qualifying"),
                    session_type: Some(String::from("Qualifying")),
                    date_start: at("2023-03-04T15:00:00Z"),
                    date_end: None,
                },
                Session {
                    session_key: FIXTURE_SESSION_KEY,
                    meeting_key: 1141,
                    session_name: String::from("Race"),
                    session_type: Some(String::from("Race")),
                    date_start: race_start,
                    date_end: Some(at("2023-03-05T17:00:00Z")),
                },
            ],
        );
        sessions.insert(1142, Vec::new());

        let mut drivers = BTreeMap::new();
        drivers.insert(
            FIXTURE_SESSION_KEY,
            vec![driver(1, Some("VER")), driver(14, Some("ALO")), driver(44, None)],
        );

        let mut laps = BTreeMap::new();
        laps.insert(
            FIXTURE_SESSION_KEY,
            vec![
                Lap {
                    driver_number: DriverNumber(1),
                    lap_number: 1,
                    date_start: Some(race_start),
                    lap_duration: None,
                },
                Lap {
                    driver_number: DriverNumber(14),
                    lap_number: 12,
                    date_start: Some(lap_start),
                    lap_duration: Some(3.5),
                },
                Lap {
                    driver_number: DriverNumber(1),
                    lap_number: 12,
                    date_start: Some(lap_start),
                    lap_duration: Some(4.5),
                },
            ],
        );

        let mut samples = square_lap(1, lap_start, 0.0);
        samples.extend(square_lap(14, lap_start, 1.0));
        samples.extend(square_lap(44, race_start, 2.0));
        let mut locations = BTreeMap::new();
        locations.insert(FIXTURE_SESSION_KEY, samples);

        Self {
            meetings,
            sessions,
            drivers,
            laps,
            locations,
            fail_with_status: None,
        }
    }
}

impl FixtureProvider {
    /// A provider that fails every call with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    fn check(&self, what: &str) -> Result<(), SourceError> {
        match self.fail_with_status {
            Some(status) => Err(SourceError::Status {
                url: format!("fixture://{what}"),
                status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TelemetryProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn meetings(&self, year: i32) -> Result<Vec<Meeting>, SourceError> {
        self.check("meetings")?;
        Ok(self.meetings.get(&year).cloned().unwrap_or_default())
    }

    async fn sessions(&self, meeting_key: u32) -> Result<Vec<Session>, SourceError> {
        self.check("sessions")?;
        Ok(self.sessions.get(&meeting_key).cloned().unwrap_or_default())
    }

    async fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, SourceError> {
        self.check("drivers")?;
        Ok(self.drivers.get(&session_key).cloned().unwrap_or_default())
    }

    async fn laps(&self, session_key: u32) -> Result<Vec<Lap>, SourceError> {
        self.check("laps")?;
        Ok(self.laps.get(&session_key).cloned().unwrap_or_default())
    }

    async fn locations(
        &self,
        session_key: u32,
        driver: DriverNumber,
        window: Option<TimeWindow>,
    ) -> Result<Vec<LocationSample>, SourceError> {
        self.check("location")?;
        Ok(self
            .locations
            .get(&session_key)
            .map(|rows| {
                rows.iter()
                    .filter(|s| s.driver_number == driver)
                    .filter(|s| window.is_none_or(|w| w.contains(s.date)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
