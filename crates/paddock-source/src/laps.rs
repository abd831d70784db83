//! Lap selection.

use std::cmp::Ordering;
use std::time::Duration;

use chrono::TimeDelta;

use crate::model::{Lap, TimeWindow};

/// Pick the lap with the smallest recorded duration.
///
/// Laps without a finite, positive duration are skipped. Ties go to the
/// lap that started first; a lap with no start time loses a tie.
pub fn pick_fastest(laps: &[Lap]) -> Option<&Lap> {
    laps.iter()
        .filter(|lap| lap.lap_duration.is_some_and(|d| d.is_finite() && d > 0.0))
        .min_by(|a, b| compare_laps(a, b))
}

fn compare_laps(a: &Lap, b: &Lap) -> Ordering {
    let da = a.lap_duration.unwrap_or(f64::INFINITY);
    let db = b.lap_duration.unwrap_or(f64::INFINITY);
    da.total_cmp(&db)
        .then_with(|| match (a.date_start, b.date_start) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// The `[start, start + duration)` window a lap was driven in.
///
/// `None` when the lap has no start time or no usable duration.
pub fn lap_window(lap: &Lap) -> Option<TimeWindow> {
    let start = lap.date_start?;
    let seconds = Duration::try_from_secs_f64(lap.lap_duration?).ok()?;
    let delta = TimeDelta::from_std(seconds).ok()?;
    let end = start.checked_add_signed(delta)?;
    Some(TimeWindow { start, end })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use paddock_types::DriverNumber;

    use super::*;

    fn lap(driver: u32, number: u32, start: Option<&str>, duration: Option<f64>) -> Lap {
        Lap {
            driver_number: DriverNumber(driver),
            lap_number: number,
            date_start: start.map(|s| s.parse::<DateTime<Utc>>().unwrap()),
            lap_duration: duration,
        }
    }

    #[test]
    fn fastest_ignores_missing_durations() {
        let laps = vec![
            lap(1, 1, Some("2023-03-05T15:03:00Z"), None),
            lap(1, 2, Some("2023-03-05T15:04:40Z"), Some(97.2)),
            lap(44, 2, Some("2023-03-05T15:04:41Z"), Some(96.8)),
            lap(16, 3, Some("2023-03-05T15:06:20Z"), Some(f64::NAN)),
        ];
        let fastest = pick_fastest(&laps).unwrap();
        assert_eq!(fastest.driver_number, DriverNumber(44));
        assert_eq!(fastest.lap_number, 2);
    }

    #[test]
    fn tie_goes_to_earlier_lap() {
        let laps = vec![
            lap(11, 40, Some("2023-03-05T16:00:00Z"), Some(95.0)),
            lap(1, 38, Some("2023-03-05T15:57:00Z"), Some(95.0)),
            lap(14, 30, None, Some(95.0)),
        ];
        assert_eq!(pick_fastest(&laps).unwrap().driver_number, DriverNumber(1));
    }

    #[test]
    fn no_timed_laps() {
        assert!(pick_fastest(&[]).is_none());
        assert!(pick_fastest(&[lap(1, 1, None, None)]).is_none());
    }

    #[test]
    fn window_spans_the_lap() {
        let l = lap(1, 2, Some("2023-03-05T15:04:40Z"), Some(90.5));
        let window = lap_window(&l).unwrap();
        assert_eq!(
            window.end,
            "2023-03-05T15:06:10.500Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(lap_window(&lap(1, 1, None, Some(90.0))).is_none());
        assert!(lap_window(&lap(1, 1, Some("2023-03-05T15:04:40Z"), Some(-1.0))).is_none());
    }
}
