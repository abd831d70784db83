//! The upstream provider seam.
//!
//! [`TelemetryProvider`] is the single boundary between Paddock and the
//! timing service that owns schedule, session, lap and position data.
//! The production implementation is [`crate::openf1::OpenF1Provider`];
//! tests substitute an in-memory fixture.

use async_trait::async_trait;
use paddock_types::DriverNumber;

use crate::error::SourceError;
use crate::model::{Driver, Lap, LocationSample, Meeting, Session, TimeWindow};

/// A source of motorsport timing and telemetry data.
///
/// Every method is a direct lookup; composition (locating an event,
/// picking the fastest lap) lives in [`crate::loader::SessionLoader`].
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &'static str;

    /// All meetings of a season, in any order.
    async fn meetings(&self, year: i32) -> Result<Vec<Meeting>, SourceError>;

    /// All sessions of a meeting.
    async fn sessions(&self, meeting_key: u32) -> Result<Vec<Session>, SourceError>;

    /// Drivers entered in a session.
    async fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, SourceError>;

    /// Every lap of a session.
    async fn laps(&self, session_key: u32) -> Result<Vec<Lap>, SourceError>;

    /// Position samples for one driver, optionally narrowed to a window.
    async fn locations(
        &self,
        session_key: u32,
        driver: DriverNumber,
        window: Option<TimeWindow>,
    ) -> Result<Vec<LocationSample>, SourceError>;
}
