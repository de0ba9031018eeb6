//! Error types for tzconvert
//!
//! This module provides the error taxonomy for the library:
//! - Row-local errors (malformed records, exhausted lookups) that skip a row
//! - Attempt-local lookup errors consumed entirely by the retry loop
//! - Run-fatal errors (file access, configuration)

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type alias for tzconvert operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tzconvert
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Input line does not match the expected record shape
    #[error("malformed record: {0}")]
    Parse(#[from] ParseError),

    /// Time-zone lookup gave up for the current row
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Input or output file cannot be opened, read, or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "lookup.base_url")
        key: Option<String>,
    },

    /// Applying the UTC offset pushed the timestamp outside the representable range
    #[error("corrected time out of range: {timestamp} with offset {offset_secs}s")]
    TimeOutOfRange {
        /// The UTC timestamp the offset was applied to
        timestamp: NaiveDateTime,
        /// The offending UTC offset in seconds
        offset_secs: i64,
    },
}

impl Error {
    /// Returns true if the error is attributable to a single input row.
    ///
    /// Row-local errors skip the row and let the run continue; everything
    /// else aborts the whole run.
    pub fn is_row_local(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::Lookup(_) | Error::TimeOutOfRange { .. }
        )
    }
}

/// Record parsing errors
///
/// Raised when an input line does not match `YYYYMMDDHHMMSS<lat>,<lng>\r\n`.
/// Always row-local.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Line ends before the fixed-width timestamp does
    #[error("line shorter than the 14-character timestamp prefix ({len} bytes)")]
    LineTooShort {
        /// Length of the offending line in bytes, terminators excluded
        len: usize,
    },

    /// Timestamp prefix is not a valid `YYYYMMDDHHMMSS` value
    #[error("timestamp {value:?} is not a valid YYYYMMDDHHMMSS value")]
    MalformedTimestamp {
        /// The offending 14-character prefix
        value: String,
        /// Calendar-level rejection, when the prefix was numeric but impossible
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// No comma separating latitude from longitude
    #[error("no comma between latitude and longitude")]
    MissingCoordinateSeparator,

    /// Longitude is not terminated by a carriage return
    #[error("longitude not terminated by a carriage return")]
    MissingLineTerminator,
}

/// Time-zone lookup errors
///
/// All variants except [`LookupError::Exhausted`] describe one failed attempt
/// cycle and are consumed by the retry loop, never surfaced past the client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport-level failure (session build, connect, send, receive)
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup service answered with a non-success status
    #[error("lookup service returned HTTP {0}")]
    HttpStatus(u16),

    /// Response body is missing one of the expected marker-delimited fields
    #[error("response body is missing the {0} field")]
    MissingField(&'static str),

    /// UTC-offset field is present but not a signed integer
    #[error("unparsable UTC offset {0:?}")]
    InvalidOffset(String),

    /// Every attempt cycle failed; the row is skipped
    #[error("time-zone lookup failed after {attempts} attempts")]
    Exhausted {
        /// Number of attempt cycles performed
        attempts: u32,
    },
}
