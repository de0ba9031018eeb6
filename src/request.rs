//! Lookup request construction
//!
//! Builds the fully-qualified URL for one time-zone lookup. The service
//! contract is fixed: path `/v2/get-time-zone`, XML response, lookup by
//! position. Percent-encoding of the coordinate values is handled by the
//! `url` crate, so arbitrary pass-through coordinate strings are safe.

use crate::config::LookupConfig;
use crate::error::Error;
use url::Url;

/// Fixed path of the lookup endpoint.
pub const LOOKUP_PATH: &str = "/v2/get-time-zone";

/// Parse and validate the configured base URL once, at client construction.
///
/// # Errors
///
/// Returns [`Error::Config`] when `lookup.base_url` is not a valid URL.
pub(crate) fn parse_base_url(config: &LookupConfig) -> Result<Url, Error> {
    Url::parse(&config.base_url).map_err(|e| Error::Config {
        message: format!("invalid lookup base URL '{}': {}", config.base_url, e),
        key: Some("lookup.base_url".to_string()),
    })
}

/// Build the lookup URL for one coordinate pair.
///
/// Pure function: the base URL was validated up front, so per-row building
/// cannot fail.
pub fn build_lookup_url(base: &Url, api_key: &str, latitude: &str, longitude: &str) -> Url {
    let mut url = base.clone();
    url.set_path(LOOKUP_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("key", api_key)
        .append_pair("format", "xml")
        .append_pair("by", "position")
        .append_pair("lat", latitude)
        .append_pair("lng", longitude);
    url
}
