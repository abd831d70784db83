//! `OpenF1` HTTP provider.
//!
//! Talks to an `OpenF1`-compatible REST service (`/meetings`, `/sessions`,
//! `/drivers`, `/laps`, `/location`). Every endpoint returns a JSON array
//! of rows. Responses pass through the optional [`DiskCache`] keyed by the
//! full request URL.
//!
//! Query strings are assembled by hand: all values are integers or
//! `YYYY-MM-DDTHH:MM:SS.fff` timestamps. The `/location` comparison
//! filters (`date>=`, `date<`) leave the client percent-encoded as
//! `date%3E=` and `date%3C`; the service decodes the raw query before it
//! parses the comparison operators.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paddock_types::DriverNumber;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::DiskCache;
use crate::error::SourceError;
use crate::model::{Driver, Lap, LocationSample, Meeting, Session, TimeWindow};
use crate::provider::TelemetryProvider;

/// Public `OpenF1` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// Connection settings for the upstream service.
#[derive(Debug, Clone)]
pub struct OpenF1Config {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for OpenF1Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// [`TelemetryProvider`] backed by an `OpenF1`-compatible HTTP API.
pub struct OpenF1Provider {
    client: reqwest::Client,
    base_url: String,
    cache: Option<DiskCache>,
}

impl OpenF1Provider {
    /// Build a provider. Pass `None` for `cache` to always hit the network.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &OpenF1Config, cache: Option<DiskCache>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("paddock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cache,
        })
    }

    /// Build the request URL for `path` with pre-formatted query pairs.
    fn url(&self, path: &str, query: &[String]) -> String {
        if query.is_empty() {
            format!("{}/{path}", self.base_url)
        } else {
            format!("{}/{path}?{}", self.base_url, query.join("&"))
        }
    }

    /// Fetch `url` (through the cache) and decode the JSON array of rows.
    ///
    /// Only non-empty results are cached: the service publishes session
    /// data while a weekend runs, so "no rows" may change later. A cached
    /// body that no longer decodes is evicted and fetched again.
    async fn fetch_rows<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, SourceError> {
        if let Some(cache) = &self.cache {
            match cache.get(url).await {
                Ok(Some(bytes)) => match decode(url, &bytes) {
                    Ok(rows) => return Ok(rows),
                    Err(e) => {
                        warn!(error = %e, "cached body unreadable, refetching upstream");
                        if let Err(e) = cache.remove(url).await {
                            warn!(error = %e, "cache evict failed");
                        }
                    }
                },
                Ok(None) => {}
                Err(e) => warn!(error = %e, "cache read failed, fetching upstream"),
            }
        }

        let Some(bytes) = self.fetch_bytes(url).await? else {
            return Ok(Vec::new());
        };
        let rows: Vec<T> = decode(url, &bytes)?;

        if !rows.is_empty()
            && let Some(cache) = &self.cache
            && let Err(e) = cache.put(url, &bytes).await
        {
            warn!(error = %e, "cache write failed");
        }

        Ok(rows)
    }

    /// Fetch the raw body of `url`. `None` means the service has no rows
    /// for the query.
    async fn fetch_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, SourceError> {
        debug!(url, "upstream request");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Http {
                url: url.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        // The service answers 404 for filters that match no rows.
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(url, "upstream has no rows");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| SourceError::Http {
            url: url.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl TelemetryProvider for OpenF1Provider {
    fn name(&self) -> &'static str {
        "openf1"
    }

    async fn meetings(&self, year: i32) -> Result<Vec<Meeting>, SourceError> {
        let url = self.url("meetings", &[format!("year={year}")]);
        self.fetch_rows(&url).await
    }

    async fn sessions(&self, meeting_key: u32) -> Result<Vec<Session>, SourceError> {
        let url = self.url("sessions", &[format!("meeting_key={meeting_key}")]);
        self.fetch_rows(&url).await
    }

    async fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, SourceError> {
        let url = self.url("drivers", &[format!("session_key={session_key}")]);
        self.fetch_rows(&url).await
    }

    async fn laps(&self, session_key: u32) -> Result<Vec<Lap>, SourceError> {
        let url = self.url("laps", &[format!("session_key={session_key}")]);
        self.fetch_rows(&url).await
    }

    async fn locations(
        &self,
        session_key: u32,
        driver: DriverNumber,
        window: Option<TimeWindow>,
    ) -> Result<Vec<LocationSample>, SourceError> {
        let mut query = vec![
            format!("session_key={session_key}"),
            format!("driver_number={driver}"),
        ];
        if let Some(window) = window {
            query.push(format!("date>={}", query_timestamp(window.start)));
            query.push(format!("date<{}", query_timestamp(window.end)));
        }
        let url = self.url("location", &query);
        self.fetch_rows(&url).await
    }
}

fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<Vec<T>, SourceError> {
    serde_json::from_slice(bytes).map_err(|source| SourceError::Decode {
        url: url.to_owned(),
        source,
    })
}

/// UTC timestamp without offset; a literal `+` would decode as a space.
fn query_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_trims_trailing_slash() {
        let config = OpenF1Config {
            base_url: String::from("http://localhost:9000/v1/"),
            ..OpenF1Config::default()
        };
        let provider = OpenF1Provider::new(&config, None).unwrap();
        assert_eq!(
            provider.url("meetings", &[String::from("year=2023")]),
            "http://localhost:9000/v1/meetings?year=2023"
        );
        assert_eq!(provider.url("meetings", &[]), "http://localhost:9000/v1/meetings");
    }

    #[test]
    fn query_timestamp_has_no_offset() {
        let at = "2023-03-05T15:04:05.250Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(query_timestamp(at), "2023-03-05T15:04:05.250");
    }

    #[test]
    fn decode_reports_url() {
        let err = decode::<Meeting>("http://upstream/meetings", b"{not json").unwrap_err();
        assert!(matches!(err, SourceError::Decode { ref url, .. } if url == "http://upstream/meetings"));
    }
}
