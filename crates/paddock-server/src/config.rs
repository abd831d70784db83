//! Configuration loading and typed config structures for the Paddock server.
//!
//! The configuration lives in `paddock-config.yaml` (path overridable via
//! `PADDOCK_CONFIG`). Every field has a default, so a missing file or an
//! empty section is fine. A handful of deployment values can be
//! overridden from the environment without editing the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use paddock_source::openf1::{DEFAULT_BASE_URL, OpenF1Config};
use serde::Deserialize;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "paddock-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {message}")]
    Env {
        /// The environment variable.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaddockConfig {
    /// Listen address and CORS origin.
    #[serde(default)]
    pub server: ServerSection,

    /// Upstream timing service.
    #[serde(default)]
    pub upstream: UpstreamSection,

    /// On-disk response cache.
    #[serde(default)]
    pub cache: CacheSection,

    /// Position socket pacing.
    #[serde(default)]
    pub stream: StreamSection,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl PaddockConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides. A missing file yields the defaults.
    ///
    /// Environment variables:
    /// - `PADDOCK_HOST` overrides `server.host`
    /// - `PADDOCK_PORT` overrides `server.port`
    /// - `PADDOCK_ALLOWED_ORIGIN` overrides `server.allowed_origin`
    /// - `PADDOCK_CACHE_DIR` overrides `cache.dir`
    /// - `PADDOCK_UPSTREAM_URL` overrides `upstream.base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `PADDOCK_PORT` is not a port number.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("PADDOCK_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("PADDOCK_PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::Env {
                name: "PADDOCK_PORT",
                message: format!("{val}: {e}"),
            })?;
        }
        if let Some(val) = lookup("PADDOCK_ALLOWED_ORIGIN") {
            self.server.allowed_origin = val;
        }
        if let Some(val) = lookup("PADDOCK_CACHE_DIR") {
            self.cache.dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("PADDOCK_UPSTREAM_URL") {
            self.upstream.base_url = val;
        }
        Ok(())
    }
}

/// Listen address and CORS origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The one frontend origin CORS admits.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Upstream timing service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamSection {
    /// Base URL of the `OpenF1`-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl UpstreamSection {
    /// Provider settings for [`paddock_source::OpenF1Provider`].
    pub fn to_openf1(&self) -> OpenF1Config {
        OpenF1Config {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// On-disk response cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheSection {
    /// Whether upstream responses are cached on disk.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache directory.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: default_cache_dir(),
        }
    }
}

/// Position socket pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamSection {
    /// Milliseconds between repeated frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl StreamSection {
    /// Frame interval as a [`Duration`].
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

const fn default_port() -> u16 {
    8000
}

fn default_allowed_origin() -> String {
    String::from(paddock_api::state::DEFAULT_ALLOWED_ORIGIN)
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_cache_enabled() -> bool {
    true
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".paddock-cache")
}

const fn default_frame_interval_ms() -> u64 {
    1_000
}

fn default_log_level() -> String {
    String::from("info")
}
