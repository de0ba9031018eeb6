//! Input record parsing
//!
//! One input row has the shape `YYYYMMDDHHMMSS<lat>,<lng>\r\n`: a fixed-width
//! UTC timestamp immediately followed by a comma-separated coordinate pair.
//! Parsing works on immutable string slices; nothing is mutated or copied
//! until the fields are extracted.

use crate::error::ParseError;
use chrono::NaiveDateTime;

/// Width of the fixed `YYYYMMDDHHMMSS` timestamp prefix, in characters.
pub const TIMESTAMP_WIDTH: usize = 14;

/// chrono format string matching the timestamp prefix.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// One parsed input row
///
/// The timestamp carries no zone; it is interpreted as UTC. Latitude and
/// longitude are passed through verbatim; range validation is the lookup
/// service's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// UTC calendar timestamp parsed from the 14-character prefix
    pub timestamp: NaiveDateTime,
    /// Latitude exactly as it appeared in the input
    pub latitude: String,
    /// Longitude exactly as it appeared in the input
    pub longitude: String,
}

impl InputRecord {
    /// Parse one raw input line into an [`InputRecord`].
    ///
    /// `line` is the row as handed over by a line-oriented reader: the
    /// trailing line feed may or may not still be attached, but the carriage
    /// return before it must be, since it terminates the longitude field. A comma
    /// directly after the timestamp is consumed as the timestamp/coordinate
    /// separator when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the line is shorter than the timestamp
    /// prefix, the prefix is not a valid `YYYYMMDDHHMMSS` value, the
    /// coordinate comma is missing, or the carriage return is missing.
    pub fn parse_line(line: &str) -> Result<Self, ParseError> {
        let body = line.strip_suffix('\n').unwrap_or(line);

        if body.len() < TIMESTAMP_WIDTH || !body.is_char_boundary(TIMESTAMP_WIDTH) {
            return Err(ParseError::LineTooShort { len: body.len() });
        }
        let (stamp, rest) = body.split_at(TIMESTAMP_WIDTH);
        // A single comma may separate the timestamp from the coordinate;
        // consume it when present so both `..SS40.7,-74.0` and `..SS,40.7,-74.0`
        // line shapes parse to the same record
        let rest = rest.strip_prefix(',').unwrap_or(rest);

        // Plain non-negative integers only; chrono would tolerate a leading sign
        if !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::MalformedTimestamp {
                value: stamp.to_string(),
                source: None,
            });
        }
        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).map_err(|e| {
            ParseError::MalformedTimestamp {
                value: stamp.to_string(),
                source: Some(e),
            }
        })?;

        let comma = rest
            .find(',')
            .ok_or(ParseError::MissingCoordinateSeparator)?;
        let latitude = &rest[..comma];
        let after = &rest[comma + 1..];
        let cr = after.find('\r').ok_or(ParseError::MissingLineTerminator)?;
        let longitude = &after[..cr];

        Ok(Self {
            timestamp,
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        })
    }
}
