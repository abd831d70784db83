//! REST API endpoint handlers.
//!
//! Each handler runs the same linear sequence through the shared
//! [`SessionLoader`](paddock_source::SessionLoader): parse the year,
//! fetch the schedule, locate the event, resolve the race session,
//! extract one field. Any failure becomes the endpoint's fixed error.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/events/{year}` | Season schedule |
//! | `GET` | `/track/{year}/{event_name}` | Fastest-lap track outline |
//! | `GET` | `/race/{year}/{event_name}/positions` | Per-driver positions |
//! | `GET` | `/race/{year}/{event_name}/drivers` | Driver abbreviations |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use paddock_types::{DriversResponse, EventsResponse, PositionsResponse, TrackResponse};

use crate::error::{
    ApiError, Cause, DRIVERS_FAILURE, EVENTS_FAILURE, POSITIONS_FAILURE, TRACK_FAILURE,
    parse_year,
};
use crate::state::AppState;

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /events/{year}`: every event of the season with its round number.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Path(year): Path<String>,
) -> Result<Json<EventsResponse>, ApiError> {
    let run = async {
        let year = parse_year(&year)?;
        let events = state.loader.events(year).await?;
        Ok::<_, Cause>(EventsResponse { events })
    };
    run.await
        .map(Json)
        .map_err(|cause| ApiError::new(EVENTS_FAILURE, cause))
}

/// `GET /track/{year}/{event_name}`: the race's fastest-lap position trace.
pub async fn get_track(
    State(state): State<Arc<AppState>>,
    Path((year, event_name)): Path<(String, String)>,
) -> Result<Json<TrackResponse>, ApiError> {
    let run = async {
        let year = parse_year(&year)?;
        let race = state.loader.load_race(year, &event_name).await?;
        let track = state.loader.track_outline(&race).await?;
        Ok::<_, Cause>(TrackResponse { track })
    };
    run.await
        .map(Json)
        .map_err(|cause| ApiError::new(TRACK_FAILURE, cause))
}

/// `GET /race/{year}/{event_name}/positions`: every driver's position series.
pub async fn get_positions(
    State(state): State<Arc<AppState>>,
    Path((year, event_name)): Path<(String, String)>,
) -> Result<Json<PositionsResponse>, ApiError> {
    let run = async {
        let year = parse_year(&year)?;
        let race = state.loader.load_race(year, &event_name).await?;
        let positions = state.loader.driver_positions(&race).await?;
        Ok::<_, Cause>(PositionsResponse { positions })
    };
    run.await
        .map(Json)
        .map_err(|cause| ApiError::new(POSITIONS_FAILURE, cause))
}

/// `GET /race/{year}/{event_name}/drivers`: abbreviation per driver.
pub async fn get_drivers(
    State(state): State<Arc<AppState>>,
    Path((year, event_name)): Path<(String, String)>,
) -> Result<Json<DriversResponse>, ApiError> {
    let run = async {
        let year = parse_year(&year)?;
        let race = state.loader.load_race(year, &event_name).await?;
        let drivers = state.loader.driver_abbreviations(&race).await?;
        Ok::<_, Cause>(DriversResponse { drivers })
    };
    run.await
        .map(Json)
        .map_err(|cause| ApiError::new(DRIVERS_FAILURE, cause))
}
