//! Per-row conversion pipeline
//!
//! One row travels parse → resolve → correct → format. Any step failure
//! short-circuits the row with the error classified by the taxonomy in
//! [`crate::error`]; the batch runner decides whether that skips the row or
//! aborts the run.

use crate::client::ZoneLookup;
use crate::error::{Error, Result};
use crate::localtime;
use crate::record::InputRecord;

/// Converts one raw input line into one output line
pub struct ConversionPipeline<L> {
    lookup: L,
}

impl<L: ZoneLookup> ConversionPipeline<L> {
    /// Create a pipeline resolving zones through the given lookup.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Convert one raw line into an output line.
    ///
    /// The output carries the coordinate fields unchanged, the resolved zone
    /// name, and the zone-corrected local timestamp:
    /// `<lat>,<lng>,<zoneName>,YYYY-MM-DDTHH:MM:SS\r\n`.
    ///
    /// # Errors
    ///
    /// Row-local errors ([`Error::Parse`], [`Error::Lookup`],
    /// [`Error::TimeOutOfRange`]) mean this row produces no output line.
    pub async fn convert_line(&self, line: &str) -> Result<String> {
        let record = InputRecord::parse_line(line)?;
        let zone = self
            .lookup
            .resolve(&record.latitude, &record.longitude)
            .await?;
        let corrected = localtime::apply_offset(record.timestamp, zone.gmt_offset_secs).ok_or(
            Error::TimeOutOfRange {
                timestamp: record.timestamp,
                offset_secs: zone.gmt_offset_secs,
            },
        )?;

        Ok(format!(
            "{},{},{},{}\r\n",
            record.latitude,
            record.longitude,
            zone.zone_name,
            localtime::format_local(corrected)
        ))
    }
}
