//! Shared application state for the race API.
//!
//! [`AppState`] holds only read-only handles: the [`SessionLoader`] that
//! wraps the upstream provider, and the [`ApiSettings`] fixed at startup.
//! No request data survives between calls.

use std::time::Duration;

use axum::http::HeaderValue;
use paddock_source::SessionLoader;

/// Frontend origin allowed when none is configured.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Pause between frames on the position socket when none is configured.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_secs(1);

/// Errors building [`ApiSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The configured origin is not a valid header value.
    #[error("invalid allowed origin `{0}`")]
    InvalidOrigin(String),
}

/// Per-deployment API settings.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// The single origin CORS admits.
    pub allowed_origin: HeaderValue,
    /// Pause between frames on the position socket. Never zero.
    pub frame_interval: Duration,
}

impl ApiSettings {
    /// Build settings, validating the origin and clamping the interval
    /// to at least one millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOrigin`] if `allowed_origin` is
    /// not a valid header value.
    pub fn new(allowed_origin: &str, frame_interval: Duration) -> Result<Self, SettingsError> {
        let allowed_origin = HeaderValue::from_str(allowed_origin.trim_end_matches('/'))
            .map_err(|e| SettingsError::InvalidOrigin(format!("{allowed_origin}: {e}")))?;
        Ok(Self {
            allowed_origin,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        })
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// Upstream access shared by every handler.
    pub loader: SessionLoader,
    /// Deployment settings.
    pub settings: ApiSettings,
}

impl AppState {
    /// Create state with default settings.
    pub fn new(loader: SessionLoader) -> Self {
        Self {
            loader,
            settings: ApiSettings::default(),
        }
    }

    /// Create state with explicit settings.
    pub const fn with_settings(loader: SessionLoader, settings: ApiSettings) -> Self {
        Self { loader, settings }
    }
}
