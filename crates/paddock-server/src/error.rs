//! Error types for the Paddock server binary.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, so `main` can
/// propagate every startup failure with `?`.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Cache directory or HTTP client setup failed.
    #[error("upstream error: {source}")]
    Source {
        /// The underlying source error.
        #[from]
        source: paddock_source::SourceError,
    },

    /// The API settings were rejected.
    #[error("settings error: {source}")]
    Settings {
        /// The underlying settings error.
        #[from]
        source: paddock_api::SettingsError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: paddock_api::ServerError,
    },
}
