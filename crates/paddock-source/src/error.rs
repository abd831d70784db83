//! Error types for the upstream provider layer.
//!
//! [`SourceError`] covers transport failures against the timing service,
//! response cache I/O, and the lookups that can legitimately come back
//! empty (unknown event, no race session, no laps).

use std::path::PathBuf;

/// Errors that can occur while fetching or shaping upstream data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("upstream request failed for {url}: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status} for {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The upstream body was not the JSON shape we expect.
    #[error("failed to decode upstream response from {url}: {source}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The on-disk response cache could not be read or written.
    #[error("cache I/O failed at {}: {source}", path.display())]
    Cache {
        /// The cache file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),

    /// No schedule row matched the requested event name.
    #[error("event `{name}` not found in {year} schedule")]
    EventNotFound {
        /// Requested season.
        year: i32,
        /// Requested event name.
        name: String,
    },

    /// The event has no race session.
    #[error("no race session for meeting {meeting_key}")]
    SessionNotFound {
        /// Upstream meeting key.
        meeting_key: u32,
    },

    /// The session has no timed laps.
    #[error("no laps available in session {session_key}")]
    NoLaps {
        /// Upstream session key.
        session_key: u32,
    },

    /// The fastest lap window contained no position samples.
    #[error("no position data for fastest lap in session {session_key}")]
    NoPositionData {
        /// Upstream session key.
        session_key: u32,
    },
}

impl SourceError {
    /// Whether the error means the requested resource does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound { .. } | Self::SessionNotFound { .. }
        )
    }

    /// Whether the error came from talking to the upstream service.
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Status { .. } | Self::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let missing = SourceError::EventNotFound {
            year: 2023,
            name: String::from("Atlantis Grand Prix"),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_upstream());

        let status = SourceError::Status {
            url: String::from("http://upstream/meetings"),
            status: 503,
        };
        assert!(status.is_upstream());
        assert!(!status.is_not_found());

        let laps = SourceError::NoLaps { session_key: 9158 };
        assert!(!laps.is_upstream());
        assert!(!laps.is_not_found());
    }

    #[test]
    fn messages_name_the_lookup() {
        let err = SourceError::SessionNotFound { meeting_key: 1219 };
        assert_eq!(err.to_string(), "no race session for meeting 1219");
    }
}
