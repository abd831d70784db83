//! Shared type definitions for the Paddock race API.
//!
//! These are the JSON shapes the frontend consumes. Field names follow the
//! capitalised column names the track animation reads (`X`, `Y`,
//! `SessionTime`, `EventName`, ...). Types flow downstream to `TypeScript`
//! via `ts-rs`.
//!
//! # Modules
//!
//! - [`driver`] -- Driver number newtype
//! - [`shapes`] -- Event, track, position and frame records plus the
//!   response envelopes for every endpoint

pub mod driver;
pub mod shapes;

pub use driver::DriverNumber;
pub use shapes::{
    DriversResponse, ErrorBody, Event, EventsResponse, FramePoint, PositionFrame, PositionSample,
    PositionsResponse, TrackPoint, TrackResponse,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::driver::DriverNumber::export_all();
        let _ = crate::shapes::Event::export_all();
        let _ = crate::shapes::TrackPoint::export_all();
        let _ = crate::shapes::PositionSample::export_all();
        let _ = crate::shapes::FramePoint::export_all();
        let _ = crate::shapes::EventsResponse::export_all();
        let _ = crate::shapes::TrackResponse::export_all();
        let _ = crate::shapes::PositionsResponse::export_all();
        let _ = crate::shapes::DriversResponse::export_all();
        let _ = crate::shapes::ErrorBody::export_all();
    }
}
