//! Session loading: the steps every endpoint shares.
//!
//! [`SessionLoader`] turns "season + event name" into a resolved race
//! session, then extracts the one field an endpoint needs. Nothing is
//! kept between calls; the provider's response cache absorbs repeats.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use paddock_types::{DriverNumber, Event, PositionFrame, PositionSample, TrackPoint};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::laps::{lap_window, pick_fastest};
use crate::model::{LocationSample, Session};
use crate::provider::TelemetryProvider;
use crate::reshape::{frame_series, position_series, track_points};
use crate::schedule::{ScheduleEntry, build_schedule, find_event};

/// Position requests in flight at once when loading a whole field.
pub const DRIVER_FETCH_CONCURRENCY: usize = 4;

/// A race session resolved from a schedule row.
#[derive(Debug, Clone)]
pub struct RaceSession {
    /// The schedule row the session belongs to.
    pub entry: ScheduleEntry,
    /// The race session itself.
    pub session: Session,
}

impl RaceSession {
    /// Upstream session key.
    pub const fn session_key(&self) -> u32 {
        self.session.session_key
    }
}

/// Composes provider lookups into endpoint-level operations.
#[derive(Clone)]
pub struct SessionLoader {
    provider: Arc<dyn TelemetryProvider>,
}

impl SessionLoader {
    /// Wrap a provider.
    pub const fn new(provider: Arc<dyn TelemetryProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// The season schedule with derived round numbers.
    pub async fn event_schedule(&self, year: i32) -> Result<Vec<ScheduleEntry>, SourceError> {
        let meetings = self.provider.meetings(year).await?;
        debug!(year, meetings = meetings.len(), "schedule fetched");
        Ok(build_schedule(meetings))
    }

    /// The season's events in the public shape.
    pub async fn events(&self, year: i32) -> Result<Vec<Event>, SourceError> {
        let schedule = self.event_schedule(year).await?;
        Ok(schedule.iter().map(ScheduleEntry::to_event).collect())
    }

    /// Locate `event_name` in the season and resolve its race session.
    pub async fn load_race(&self, year: i32, event_name: &str) -> Result<RaceSession, SourceError> {
        let schedule = self.event_schedule(year).await?;
        let entry = find_event(&schedule, event_name)
            .cloned()
            .ok_or_else(|| SourceError::EventNotFound {
                year,
                name: event_name.to_owned(),
            })?;

        let meeting_key = entry.meeting.meeting_key;
        let session = self
            .provider
            .sessions(meeting_key)
            .await?
            .into_iter()
            .find(Session::is_race)
            .ok_or(SourceError::SessionNotFound { meeting_key })?;

        info!(
            year,
            event = event_name,
            round = entry.round,
            session_key = session.session_key,
            "race session resolved"
        );

        Ok(RaceSession { entry, session })
    }

    /// Position trace of the session's fastest lap.
    pub async fn track_outline(&self, race: &RaceSession) -> Result<Vec<TrackPoint>, SourceError> {
        let session_key = race.session_key();
        let laps = self.provider.laps(session_key).await?;
        let fastest = pick_fastest(&laps).ok_or(SourceError::NoLaps { session_key })?;
        let window = lap_window(fastest).ok_or(SourceError::NoLaps { session_key })?;

        debug!(
            session_key,
            driver = %fastest.driver_number,
            lap = fastest.lap_number,
            duration = fastest.lap_duration,
            "fastest lap picked"
        );

        let samples = self
            .provider
            .locations(session_key, fastest.driver_number, Some(window))
            .await?;
        let track = track_points(&samples);
        if track.is_empty() {
            return Err(SourceError::NoPositionData { session_key });
        }
        Ok(track)
    }

    /// Raw position samples for every driver of the session.
    ///
    /// At most [`DRIVER_FETCH_CONCURRENCY`] drivers are fetched at once.
    pub async fn session_positions(
        &self,
        race: &RaceSession,
    ) -> Result<BTreeMap<DriverNumber, Vec<LocationSample>>, SourceError> {
        let session_key = race.session_key();
        let drivers = self.provider.drivers(session_key).await?;

        let fetches: Vec<_> = drivers
            .iter()
            .map(|driver| {
                let number = driver.driver_number;
                async move {
                    let samples = self.provider.locations(session_key, number, None).await?;
                    Ok::<_, SourceError>((number, samples))
                }
            })
            .collect();
        let table: BTreeMap<_, _> = stream::iter(fetches)
            .buffered(DRIVER_FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        debug!(session_key, drivers = table.len(), "positions loaded");
        Ok(table)
    }

    /// Position series per driver, timed against the session start.
    pub async fn driver_positions(
        &self,
        race: &RaceSession,
    ) -> Result<BTreeMap<DriverNumber, Vec<PositionSample>>, SourceError> {
        let table = self.session_positions(race).await?;
        let start = race.session.date_start;
        Ok(table
            .iter()
            .map(|(driver, samples)| (*driver, position_series(samples, start)))
            .collect())
    }

    /// One streaming frame built from the session's position table.
    pub async fn position_frame(&self, race: &RaceSession) -> Result<PositionFrame, SourceError> {
        let table = self.session_positions(race).await?;
        Ok(table
            .iter()
            .map(|(driver, samples)| (*driver, frame_series(samples)))
            .collect())
    }

    /// Three-letter abbreviation per driver.
    ///
    /// Drivers without an acronym fall back to their car number so the
    /// key set always equals the session's driver set.
    pub async fn driver_abbreviations(
        &self,
        race: &RaceSession,
    ) -> Result<BTreeMap<DriverNumber, String>, SourceError> {
        let drivers = self.provider.drivers(race.session_key()).await?;
        Ok(drivers
            .into_iter()
            .map(|d| {
                let abbreviation = d
                    .name_acronym
                    .unwrap_or_else(|| d.driver_number.to_string());
                (d.driver_number, abbreviation)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::fixture::{
        FIXTURE_EVENT, FIXTURE_EVENT_WITHOUT_RACE, FIXTURE_SESSION_KEY, FIXTURE_YEAR,
        FixtureProvider,
    };
    use crate::model::{Driver, Lap, Meeting, TimeWindow};

    fn loader(provider: FixtureProvider) -> SessionLoader {
        SessionLoader::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn events_are_numbered_in_date_order() {
        let events = loader(FixtureProvider::default())
            .events(FIXTURE_YEAR)
            .await
            .unwrap();
        let rounds: Vec<u32> = events.iter().map(|e| e.round_number).collect();
        assert_eq!(rounds, vec![0, 1, 2]);
        assert_eq!(events.get(1).unwrap().event_name, FIXTURE_EVENT);
    }

    #[tokio::test]
    async fn unknown_season_is_empty_not_an_error() {
        let events = loader(FixtureProvider::default()).events(1950).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn resolves_the_race_not_qualifying() {
        let race = loader(FixtureProvider::default())
            .load_race(FIXTURE_YEAR, FIXTURE_EVENT)
            .await
            .unwrap();
        assert_eq!(race.session_key(), FIXTURE_SESSION_KEY);
        assert_eq!(race.entry.round, 1);
    }

    #[tokio::test]
    async fn unknown_event_and_missing_race() {
        let l = loader(FixtureProvider::default());
        let err = l.load_race(FIXTURE_YEAR, "Atlantis Grand Prix").await.unwrap_err();
        assert!(matches!(err, SourceError::EventNotFound { .. }));

        let err = l
            .load_race(FIXTURE_YEAR, FIXTURE_EVENT_WITHOUT_RACE)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::SessionNotFound { meeting_key: 1142 }));
    }

    #[tokio::test]
    async fn track_follows_the_fastest_lap() {
        let l = loader(FixtureProvider::default());
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let track = l.track_outline(&race).await.unwrap();

        // Driver 14 holds the fastest lap; its samples are offset by 1.0.
        assert_eq!(track.len(), 4);
        assert_eq!(track.first(), Some(&TrackPoint { x: 1.0, y: 1.0 }));
        assert!(track.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[tokio::test]
    async fn track_without_laps() {
        let mut provider = FixtureProvider::default();
        provider.laps.clear();
        let l = loader(provider);
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let err = l.track_outline(&race).await.unwrap_err();
        assert!(matches!(err, SourceError::NoLaps { .. }));
    }

    #[tokio::test]
    async fn track_without_samples_in_window() {
        let mut provider = FixtureProvider::default();
        provider.locations.clear();
        let l = loader(provider);
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let err = l.track_outline(&race).await.unwrap_err();
        assert!(matches!(err, SourceError::NoPositionData { .. }));
    }

    #[tokio::test]
    async fn positions_cover_every_driver() {
        let l = loader(FixtureProvider::default());
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let positions = l.driver_positions(&race).await.unwrap();

        let keys: Vec<u32> = positions.keys().map(|d| d.into_inner()).collect();
        assert_eq!(keys, vec![1, 14, 44]);

        // Driver 44 starts at the race start, driver 1 ten minutes in.
        let first_44 = positions.get(&DriverNumber(44)).unwrap().first().unwrap();
        assert!(first_44.session_time.abs() < 1e-9);
        let first_1 = positions.get(&DriverNumber(1)).unwrap().first().unwrap();
        assert!((first_1.session_time - 600.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn frames_restart_time_per_driver() {
        let l = loader(FixtureProvider::default());
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let frame = l.position_frame(&race).await.unwrap();
        assert_eq!(frame.len(), 3);
        assert!(frame.values().all(|series| {
            series.first().is_some_and(|p| p.time.abs() < 1e-9)
        }));
    }

    #[tokio::test]
    async fn abbreviation_keys_equal_driver_set() {
        let l = loader(FixtureProvider::default());
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let abbreviations = l.driver_abbreviations(&race).await.unwrap();

        assert_eq!(abbreviations.get(&DriverNumber(1)).map(String::as_str), Some("VER"));
        assert_eq!(abbreviations.get(&DriverNumber(44)).map(String::as_str), Some("44"));
        assert_eq!(abbreviations.len(), 3);
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let err = loader(FixtureProvider::failing(503))
            .events(FIXTURE_YEAR)
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    /// Wraps the fixture and records the peak number of concurrent
    /// location requests.
    struct ConcurrencyGauge {
        inner: FixtureProvider,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl TelemetryProvider for ConcurrencyGauge {
        fn name(&self) -> &'static str {
            "throttle"
        }

        async fn meetings(&self, year: i32) -> Result<Vec<Meeting>, SourceError> {
            self.inner.meetings(year).await
        }

        async fn sessions(&self, meeting_key: u32) -> Result<Vec<Session>, SourceError> {
            self.inner.sessions(meeting_key).await
        }

        async fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, SourceError> {
            self.inner.drivers(session_key).await
        }

        async fn laps(&self, session_key: u32) -> Result<Vec<Lap>, SourceError> {
            self.inner.laps(session_key).await
        }

        async fn locations(
            &self,
            session_key: u32,
            driver: DriverNumber,
            window: Option<TimeWindow>,
        ) -> Result<Vec<LocationSample>, SourceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.locations(session_key, driver, window).await
        }
    }

    #[tokio::test]
    async fn full_field_is_fetched_with_bounded_concurrency() {
        let mut inner = FixtureProvider::default();
        let field: Vec<Driver> = (1..=20)
            .map(|n| Driver {
                driver_number: DriverNumber(n),
                name_acronym: None,
                full_name: None,
                team_name: None,
            })
            .collect();
        inner.drivers.insert(FIXTURE_SESSION_KEY, field);

        let provider = Arc::new(ConcurrencyGauge {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let l = SessionLoader::new(provider.clone());
        let race = l.load_race(FIXTURE_YEAR, FIXTURE_EVENT).await.unwrap();
        let table = l.session_positions(&race).await.unwrap();

        assert_eq!(table.len(), 20);
        let peak = provider.peak.load(Ordering::SeqCst);
        assert!((1..=DRIVER_FETCH_CONCURRENCY).contains(&peak), "peak {peak}");
    }
}
