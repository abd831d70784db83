//! Upstream record types.
//!
//! These mirror the rows returned by the timing service. Only the columns
//! the façade reads are modelled; unknown columns are ignored on decode.
//! Optional columns are `null` often enough in practice (unclassified
//! drivers, in-laps without a duration) that they default to `None`.

use chrono::{DateTime, Utc};
use paddock_types::DriverNumber;
use serde::{Deserialize, Serialize};

/// One event weekend (a "meeting") in a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Upstream meeting key.
    pub meeting_key: u32,
    /// Display name, e.g. `Bahrain Grand Prix`.
    pub meeting_name: String,
    /// Sponsor-qualified name.
    #[serde(default)]
    pub meeting_official_name: Option<String>,
    /// Host country.
    #[serde(default)]
    pub country_name: Option<String>,
    /// Host city or venue.
    #[serde(default)]
    pub location: Option<String>,
    /// Short circuit name, e.g. `Sakhir`.
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    /// Start of the first session of the weekend.
    pub date_start: DateTime<Utc>,
    /// Championship season.
    pub year: i32,
}

impl Meeting {
    /// Whether this meeting is a testing event rather than a championship round.
    pub fn is_testing(&self) -> bool {
        self.meeting_name.to_ascii_lowercase().contains("testing")
    }
}

/// One session (practice, qualifying, race, ...) of a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Upstream session key.
    pub session_key: u32,
    /// Owning meeting.
    pub meeting_key: u32,
    /// Session name, e.g. `Race`, `Sprint`, `Qualifying`.
    pub session_name: String,
    /// Session category, e.g. `Race`, `Practice`.
    #[serde(default)]
    pub session_type: Option<String>,
    /// Scheduled start.
    pub date_start: DateTime<Utc>,
    /// Scheduled end.
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
}

/// Name of the grand prix session.
pub const RACE_SESSION_NAME: &str = "Race";

impl Session {
    /// Whether this is the main race (not a sprint).
    pub fn is_race(&self) -> bool {
        self.session_name == RACE_SESSION_NAME
    }
}

/// A driver entered in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Permanent car number.
    pub driver_number: DriverNumber,
    /// Three-letter abbreviation, e.g. `VER`.
    #[serde(default)]
    pub name_acronym: Option<String>,
    /// Full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Team name.
    #[serde(default)]
    pub team_name: Option<String>,
}

/// One lap driven in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Driver who drove the lap.
    pub driver_number: DriverNumber,
    /// Lap number, starting at 1.
    pub lap_number: u32,
    /// When the lap started.
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    /// Lap time in seconds.
    #[serde(default)]
    pub lap_duration: Option<f64>,
}

/// One on-track position sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Driver the sample belongs to.
    pub driver_number: DriverNumber,
    /// Sample timestamp.
    pub date: DateTime<Utc>,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Elevation.
    #[serde(default)]
    pub z: f64,
}

/// Half-open time range `[start, end)` used to narrow position queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}
