//! Time-zone lookup client
//!
//! This module provides a trait-based seam for coordinate-to-zone resolution.
//! The core abstraction is the [`ZoneLookup`] trait; [`TimeZoneClient`] is the
//! production implementation talking to the remote lookup service.
//!
//! Each attempt cycle opens its own transport session (a fresh HTTP client),
//! issues one GET, buffers the full body, and extracts the two
//! marker-delimited fields. Any failure inside a cycle aborts only that
//! cycle; the bounded retry loop decides whether another one starts. All
//! per-cycle resources are dropped when the cycle ends, success or not.

use crate::config::{LookupConfig, RetryConfig};
use crate::error::{Error, LookupError, Result};
use crate::request::{build_lookup_url, parse_base_url};
use crate::retry::resolve_with_retry;
use async_trait::async_trait;
use url::Url;

/// Markers delimiting the zone-name field in the response body.
const ZONE_NAME_OPEN: &str = "<zoneName>";
const ZONE_NAME_CLOSE: &str = "</zoneName>";
/// Markers delimiting the UTC-offset field.
const GMT_OFFSET_OPEN: &str = "<gmtOffset>";
const GMT_OFFSET_CLOSE: &str = "</gmtOffset>";

/// Resolved time zone for one coordinate
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneResult {
    /// IANA-style zone name, e.g. "America/New_York"
    pub zone_name: String,
    /// UTC offset in whole seconds, signed
    pub gmt_offset_secs: i64,
}

/// Trait for resolving a coordinate to a time zone
///
/// The conversion pipeline and batch runner depend on this trait rather than
/// on a concrete client, so they are testable with a scripted fake.
#[async_trait]
pub trait ZoneLookup: Send + Sync {
    /// Resolve a coordinate pair to a zone name and UTC offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] with [`LookupError::Exhausted`] when every
    /// attempt cycle failed. Individual cycle failures are never surfaced.
    async fn resolve(&self, latitude: &str, longitude: &str) -> Result<TimeZoneResult>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Production lookup client for the remote time-zone service
#[derive(Debug)]
pub struct TimeZoneClient {
    base: Url,
    lookup: LookupConfig,
    retry: RetryConfig,
}

impl TimeZoneClient {
    /// Create a client, validating the configured base URL up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `lookup.base_url` does not parse.
    pub fn new(lookup: LookupConfig, retry: RetryConfig) -> Result<Self> {
        let base = parse_base_url(&lookup)?;
        Ok(Self {
            base,
            lookup,
            retry,
        })
    }

    /// One attempt cycle: fresh session, one GET, buffer and parse the body.
    async fn attempt(&self, url: &Url) -> std::result::Result<TimeZoneResult, LookupError> {
        // A fresh client per cycle keeps attempts fully isolated from each
        // other; the session is dropped with this scope on every exit path.
        let client = reqwest::Client::builder()
            .user_agent(self.lookup.user_agent.clone())
            .timeout(self.lookup.request_timeout)
            .build()?;

        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        parse_lookup_body(&body)
    }
}

#[async_trait]
impl ZoneLookup for TimeZoneClient {
    async fn resolve(&self, latitude: &str, longitude: &str) -> Result<TimeZoneResult> {
        let url = build_lookup_url(&self.base, &self.lookup.api_key, latitude, longitude);
        tracing::debug!(lat = latitude, lng = longitude, "resolving time zone");

        resolve_with_retry(&self.retry, || {
            let url = url.clone();
            async move { self.attempt(&url).await }
        })
        .await
        .map_err(|_| {
            Error::Lookup(LookupError::Exhausted {
                attempts: self.retry.max_attempts,
            })
        })
    }

    fn name(&self) -> &'static str {
        "timezonedb"
    }
}

/// Extract the zone name and UTC offset from a lookup response body.
///
/// The body is scanned for the marker pairs rather than parsed as XML; the
/// service contract fixes the format, and a body that does not carry both
/// fields counts as a failed cycle. The offset markers are searched only
/// after the zone-name close marker.
fn parse_lookup_body(body: &str) -> std::result::Result<TimeZoneResult, LookupError> {
    let zone_start = body
        .find(ZONE_NAME_OPEN)
        .ok_or(LookupError::MissingField("zoneName"))?
        + ZONE_NAME_OPEN.len();
    let zone_len = body[zone_start..]
        .find(ZONE_NAME_CLOSE)
        .ok_or(LookupError::MissingField("zoneName"))?;
    let zone_name = &body[zone_start..zone_start + zone_len];

    let tail = &body[zone_start + zone_len + ZONE_NAME_CLOSE.len()..];
    let offset_start = tail
        .find(GMT_OFFSET_OPEN)
        .ok_or(LookupError::MissingField("gmtOffset"))?
        + GMT_OFFSET_OPEN.len();
    let offset_len = tail[offset_start..]
        .find(GMT_OFFSET_CLOSE)
        .ok_or(LookupError::MissingField("gmtOffset"))?;
    let raw_offset = &tail[offset_start..offset_start + offset_len];

    let gmt_offset_secs = raw_offset
        .trim()
        .parse::<i64>()
        .map_err(|_| LookupError::InvalidOffset(raw_offset.to_string()))?;

    Ok(TimeZoneResult {
        zone_name: zone_name.to_string(),
        gmt_offset_secs,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn zone_body(zone: &str, offset: i64) -> String {
        format!(
            "<?xml version=\"1.0\"?><result><status>OK</status>\
             <zoneName>{zone}</zoneName><gmtOffset>{offset}</gmtOffset></result>"
        )
    }

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    fn client_for(server: &MockServer, max_attempts: u32) -> TimeZoneClient {
        let lookup = LookupConfig {
            base_url: server.uri(),
            api_key: "TESTKEY".to_string(),
            request_timeout: Duration::from_secs(5),
            ..LookupConfig::default()
        };
        TimeZoneClient::new(lookup, fast_retry(max_attempts)).unwrap()
    }

    // -----------------------------------------------------------------------
    // parse_lookup_body
    // -----------------------------------------------------------------------

    #[test]
    fn body_with_both_fields_parses() {
        let result = parse_lookup_body(&zone_body("America/New_York", -14400)).unwrap();
        assert_eq!(result.zone_name, "America/New_York");
        assert_eq!(result.gmt_offset_secs, -14400);
    }

    #[test]
    fn positive_offset_parses() {
        let result = parse_lookup_body(&zone_body("Asia/Tokyo", 32400)).unwrap();
        assert_eq!(result.gmt_offset_secs, 32400);
    }

    #[test]
    fn missing_zone_name_markers_fail_the_cycle() {
        let err = parse_lookup_body("<gmtOffset>3600</gmtOffset>").unwrap_err();
        assert!(matches!(err, LookupError::MissingField("zoneName")));

        let err = parse_lookup_body("<zoneName>Europe/Berlin").unwrap_err();
        assert!(matches!(err, LookupError::MissingField("zoneName")));
    }

    #[test]
    fn missing_offset_markers_fail_the_cycle() {
        let err = parse_lookup_body("<zoneName>Europe/Berlin</zoneName>").unwrap_err();
        assert!(matches!(err, LookupError::MissingField("gmtOffset")));
    }

    #[test]
    fn offset_before_zone_name_is_not_accepted() {
        // The offset is searched only after </zoneName>
        let body = "<gmtOffset>3600</gmtOffset><zoneName>Europe/Berlin</zoneName>";
        let err = parse_lookup_body(body).unwrap_err();
        assert!(matches!(err, LookupError::MissingField("gmtOffset")));
    }

    #[test]
    fn unparsable_offset_fails_the_cycle() {
        let body = "<zoneName>Europe/Berlin</zoneName><gmtOffset>soon</gmtOffset>";
        let err = parse_lookup_body(body).unwrap_err();
        assert!(matches!(err, LookupError::InvalidOffset(ref v) if v == "soon"));
    }

    #[test]
    fn empty_zone_name_is_passed_through() {
        // Marker scanning has no opinion on field content
        let result = parse_lookup_body("<zoneName></zoneName><gmtOffset>0</gmtOffset>").unwrap();
        assert_eq!(result.zone_name, "");
        assert_eq!(result.gmt_offset_secs, 0);
    }

    // -----------------------------------------------------------------------
    // TimeZoneClient against a mock service
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn successful_lookup_resolves_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/get-time-zone"))
            .and(query_param("key", "TESTKEY"))
            .and(query_param("by", "position"))
            .and(query_param("format", "xml"))
            .and(query_param("lat", "40.7128"))
            .and(query_param("lng", "-74.0060"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(zone_body("America/New_York", -14400)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, 3);
        let result = client.resolve("40.7128", "-74.0060").await.unwrap();

        assert_eq!(result.zone_name, "America/New_York");
        assert_eq!(result.gmt_offset_secs, -14400);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transient_server_errors_are_retried_until_success() {
        let server = MockServer::start().await;
        // First two cycles hit a 503, the third gets a clean body
        Mock::given(method("GET"))
            .and(path("/v2/get-time-zone"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/get-time-zone"))
            .respond_with(ResponseTemplate::new(200).set_body_string(zone_body("Asia/Tokyo", 32400)))
            .mount(&server)
            .await;

        let client = client_for(&server, 5);
        let result = client.resolve("35.68", "139.69").await.unwrap();

        assert_eq!(result.zone_name, "Asia/Tokyo");
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn garbled_body_is_retried_like_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<status>FAILED</status>"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(zone_body("Europe/Berlin", 3600)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, 5);
        let result = client.resolve("52.52", "13.40").await.unwrap();

        assert_eq!(result.zone_name, "Europe/Berlin");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_attempts_fail_the_row_and_respect_the_ceiling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, 4);
        let err = client.resolve("0", "0").await.unwrap_err();

        assert!(matches!(
            err,
            Error::Lookup(LookupError::Exhausted { attempts: 4 })
        ));
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            4,
            "one request per attempt cycle, no more"
        );
    }

    #[tokio::test]
    async fn success_stops_further_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(zone_body("UTC", 0)))
            .mount(&server)
            .await;

        let client = client_for(&server, 50);
        let result = client.resolve("0", "0").await.unwrap();

        assert_eq!(result.zone_name, "UTC");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let lookup = LookupConfig {
            base_url: "::not-a-url::".to_string(),
            ..LookupConfig::default()
        };
        let err = TimeZoneClient::new(lookup, RetryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
