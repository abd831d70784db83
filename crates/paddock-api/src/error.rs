//! Error types for the race API.
//!
//! Every endpoint reports failure with one fixed message (for example
//! `Failed to load track info`) regardless of cause; the cause only picks
//! the HTTP status and is written to the log. [`ApiError`] pairs the two
//! and renders the `{"error": ..., "status": ...}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paddock_source::SourceError;
use paddock_types::ErrorBody;
use tracing::{error, warn};

/// Fixed message for `GET /events/{year}`.
pub const EVENTS_FAILURE: &str = "Failed to load events";
/// Fixed message for `GET /track/{year}/{event_name}`.
pub const TRACK_FAILURE: &str = "Failed to load track info";
/// Fixed message for `GET /race/{year}/{event_name}/positions` and the socket.
pub const POSITIONS_FAILURE: &str = "Failed to load driver positions";
/// Fixed message for `GET /race/{year}/{event_name}/drivers`.
pub const DRIVERS_FAILURE: &str = "Failed to load driver abbreviations";

/// Why a request failed.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// The `year` path segment is not an integer.
    #[error("invalid year: {0}")]
    InvalidYear(String),

    /// Fetching or shaping upstream data failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Cause {
    /// HTTP status for this cause.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidYear(_) => StatusCode::BAD_REQUEST,
            Self::Source(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Source(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            Self::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A failed API request: the endpoint's fixed message plus the cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}: {cause}")]
pub struct ApiError {
    message: &'static str,
    #[source]
    cause: Cause,
}

impl ApiError {
    /// Attach an endpoint message to a cause.
    pub const fn new(message: &'static str, cause: Cause) -> Self {
        Self { message, cause }
    }

    /// The fixed endpoint message.
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// The underlying cause.
    pub const fn cause(&self) -> &Cause {
        &self.cause
    }

    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        self.cause.status()
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.to_owned(),
            status: self.status().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), cause = %self.cause, "{}", self.message);
        } else {
            warn!(status = status.as_u16(), cause = %self.cause, "{}", self.message);
        }

        (status, axum::Json(self.body())).into_response()
    }
}

/// Parse the `year` path segment.
pub fn parse_year(raw: &str) -> Result<i32, Cause> {
    raw.trim()
        .parse::<i32>()
        .map_err(|e| Cause::InvalidYear(format!("`{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_by_cause() {
        assert_eq!(
            Cause::InvalidYear(String::from("20x3")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Cause::from(SourceError::EventNotFound {
                year: 2023,
                name: String::from("Nowhere"),
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Cause::from(SourceError::Status {
                url: String::from("http://upstream/laps"),
                status: 500,
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Cause::from(SourceError::NoLaps { session_key: 1 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_keeps_the_fixed_message() {
        let err = ApiError::new(
            TRACK_FAILURE,
            Cause::from(SourceError::SessionNotFound { meeting_key: 9 }),
        );
        let body = err.body();
        assert_eq!(body.error, "Failed to load track info");
        assert_eq!(body.status, 404);
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("2023").ok(), Some(2023));
        assert!(matches!(parse_year("twenty"), Err(Cause::InvalidYear(_))));
    }
}
