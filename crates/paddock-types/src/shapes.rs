//! JSON records and response envelopes served by the race API.
//!
//! Each endpoint wraps its payload in a single-key object (`events`,
//! `track`, `positions`, `drivers`). Failures share [`ErrorBody`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::driver::DriverNumber;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of a season schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Display name of the event, e.g. `Bahrain Grand Prix`.
    #[serde(rename = "EventName")]
    pub event_name: String,
    /// Championship round. Pre-season testing is round `0`.
    #[serde(rename = "RoundNumber")]
    pub round_number: u32,
}

/// One coordinate of the track outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrackPoint {
    /// Horizontal track coordinate.
    #[serde(rename = "X")]
    pub x: f64,
    /// Vertical track coordinate.
    #[serde(rename = "Y")]
    pub y: f64,
}

/// A driver position sample keyed to the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PositionSample {
    /// Horizontal track coordinate.
    #[serde(rename = "X")]
    pub x: f64,
    /// Vertical track coordinate.
    #[serde(rename = "Y")]
    pub y: f64,
    /// Seconds since the session started. Negative before the start.
    #[serde(rename = "SessionTime")]
    pub session_time: f64,
}

/// A driver position sample inside a streamed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FramePoint {
    /// Horizontal track coordinate.
    #[serde(rename = "X")]
    pub x: f64,
    /// Vertical track coordinate.
    #[serde(rename = "Y")]
    pub y: f64,
    /// Seconds since the driver's first sample in the table.
    #[serde(rename = "Time")]
    pub time: f64,
}

/// One `WebSocket` message: every driver's position series.
pub type PositionFrame = BTreeMap<DriverNumber, Vec<FramePoint>>;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `GET /events/{year}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventsResponse {
    /// Schedule rows in date order.
    pub events: Vec<Event>,
}

/// `GET /track/{year}/{event_name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrackResponse {
    /// Fastest-lap position trace.
    pub track: Vec<TrackPoint>,
}

/// `GET /race/{year}/{event_name}/positions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PositionsResponse {
    /// Position series per driver.
    pub positions: BTreeMap<DriverNumber, Vec<PositionSample>>,
}

/// `GET /race/{year}/{event_name}/drivers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DriversResponse {
    /// Three-letter abbreviation per driver.
    pub drivers: BTreeMap<DriverNumber, String>,
}

/// Error payload shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorBody {
    /// Fixed, endpoint-specific failure message.
    pub error: String,
    /// HTTP status code mirrored into the body.
    pub status: u16,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn event_uses_capitalised_keys() {
        let event = Event {
            event_name: String::from("Italian Grand Prix"),
            round_number: 14,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["EventName"], "Italian Grand Prix");
        assert_eq!(json["RoundNumber"], 14);
    }

    #[test]
    fn position_sample_keys() {
        let sample = PositionSample {
            x: 1.5,
            y: -2.0,
            session_time: 12.25,
        };
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["X"], 1.5);
        assert_eq!(json["Y"], -2.0);
        assert_eq!(json["SessionTime"], 12.25);
    }

    #[test]
    fn frame_is_keyed_by_driver_number() {
        let mut frame = PositionFrame::new();
        frame.insert(
            DriverNumber(63),
            vec![FramePoint {
                x: 0.0,
                y: 1.0,
                time: 0.0,
            }],
        );
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["63"][0]["Time"], 0.0);
        assert_eq!(json["63"][0]["Y"], 1.0);
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            error: String::from("Failed to load track info"),
            status: 404,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Failed to load track info", "status": 404}));
    }
}
