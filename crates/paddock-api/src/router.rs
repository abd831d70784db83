//! Axum router construction for the race API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS restricted to the one configured frontend origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness probe
/// - `GET /events/{year}` -- season schedule
/// - `GET /track/{year}/{event_name}` -- fastest-lap track outline
/// - `GET /race/{year}/{event_name}/positions` -- per-driver positions
/// - `GET /race/{year}/{event_name}/drivers` -- driver abbreviations
/// - `GET /ws/race/{year}/{event_name}` -- `WebSocket` position stream
///
/// CORS admits only [`ApiSettings::allowed_origin`](crate::state::ApiSettings),
/// with credentials. Methods and headers are mirrored from the request,
/// since wildcards are not allowed alongside credentials.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([state.settings.allowed_origin.clone()]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws/race/{year}/{event_name}", get(ws::ws_race))
        // REST API
        .route("/events/{year}", get(handlers::list_events))
        .route("/track/{year}/{event_name}", get(handlers::get_track))
        .route("/race/{year}/{event_name}/positions", get(handlers::get_positions))
        .route("/race/{year}/{event_name}/drivers", get(handlers::get_drivers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
