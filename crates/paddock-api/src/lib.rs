//! Race API server for Paddock.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for a season's events, a race's track outline,
//!   per-driver positions, and driver abbreviations
//! - **`WebSocket` endpoint** (`/ws/race/{year}/{event_name}`) that
//!   repeatedly pushes a race's position table
//!
//! # Architecture
//!
//! Handlers are stateless. Each request resolves its race session
//! through [`SessionLoader`](paddock_source::SessionLoader), which
//! delegates to the upstream timing service; the provider's on-disk
//! cache makes repeated requests cheap.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::{ApiError, Cause};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{ApiSettings, AppState, SettingsError};
