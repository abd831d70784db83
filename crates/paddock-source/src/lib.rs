//! Upstream data access for the Paddock race API.
//!
//! Paddock does not model timing data itself. Everything comes from an
//! external timing service reached through [`TelemetryProvider`]; this
//! crate adds only the glue every endpoint shares:
//!
//! - [`openf1`] -- HTTP provider for an `OpenF1`-compatible service
//! - [`cache`] -- on-disk response cache keyed by request URL
//! - [`schedule`] -- round numbering and event lookup
//! - [`laps`] -- fastest-lap selection
//! - [`reshape`] -- conversion to the public JSON records
//! - [`loader`] -- [`SessionLoader`], the per-endpoint sequences

pub mod cache;
pub mod error;
#[cfg(any(test, feature = "fixture"))]
pub mod fixture;
pub mod laps;
pub mod loader;
pub mod model;
pub mod openf1;
pub mod provider;
pub mod reshape;
pub mod schedule;

pub use cache::DiskCache;
pub use error::SourceError;
pub use loader::{RaceSession, SessionLoader};
pub use model::{Driver, Lap, LocationSample, Meeting, Session, TimeWindow};
pub use openf1::{OpenF1Config, OpenF1Provider};
pub use provider::TelemetryProvider;
pub use schedule::ScheduleEntry;
