//! Conversion from upstream samples to the public JSON records.

use chrono::{DateTime, Utc};
use paddock_types::{FramePoint, PositionSample, TrackPoint};

use crate::model::LocationSample;

/// Signed seconds from `from` to `to`.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    match to.signed_duration_since(from).to_std() {
        Ok(forward) => forward.as_secs_f64(),
        Err(_) => from
            .signed_duration_since(to)
            .to_std()
            .map_or(0.0, |backward| -backward.as_secs_f64()),
    }
}

fn is_plottable(sample: &LocationSample) -> bool {
    sample.x.is_finite() && sample.y.is_finite()
}

/// Track outline points, dropping non-finite coordinates.
pub fn track_points(samples: &[LocationSample]) -> Vec<TrackPoint> {
    samples
        .iter()
        .filter(|s| is_plottable(s))
        .map(|s| TrackPoint { x: s.x, y: s.y })
        .collect()
}

/// Position series timed against the session start.
pub fn position_series(
    samples: &[LocationSample],
    session_start: DateTime<Utc>,
) -> Vec<PositionSample> {
    samples
        .iter()
        .filter(|s| is_plottable(s))
        .map(|s| PositionSample {
            x: s.x,
            y: s.y,
            session_time: seconds_between(session_start, s.date),
        })
        .collect()
}

/// Frame series timed against the driver's first plottable sample.
pub fn frame_series(samples: &[LocationSample]) -> Vec<FramePoint> {
    let plottable = || samples.iter().filter(|s| is_plottable(s));
    let Some(origin) = plottable().map(|s| s.date).min() else {
        return Vec::new();
    };
    plottable()
        .map(|s| FramePoint {
            x: s.x,
            y: s.y,
            time: seconds_between(origin, s.date),
        })
        .collect()
}
