//! Configuration types for tzconvert

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Main configuration for a conversion run
///
/// All fields have sensible defaults matching the conventional file layout:
/// rows are read from `input.csv` and appended to `output.csv` in the current
/// directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Input CSV path (default: "input.csv")
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Output CSV path, opened in append mode and created if absent
    /// (default: "output.csv")
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Time-zone lookup service settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Retry behavior for lookup attempts
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            lookup: LookupConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Time-zone lookup service configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the lookup service (default: "http://api.timezonedb.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API credential interpolated into every request
    #[serde(default)]
    pub api_key: String,

    /// Deadline for a single attempt cycle (default: 30 seconds)
    ///
    /// A hung request aborts the cycle instead of stalling the run; the
    /// retry loop treats the timeout like any other transport failure.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry configuration for lookup attempts
///
/// `max_attempts` is the total number of attempt cycles per row, not the
/// number of retries after the first failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempt cycles per row (default: 50)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between attempts (default: 5 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("input.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_base_url() -> String {
    "http://api.timezonedb.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("Time Zone API/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_attempts() -> u32 {
    50
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
