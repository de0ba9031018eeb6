//! Batch execution
//!
//! Drives the per-row pipeline over a whole input: a pre-pass counts the
//! rows, then the main pass processes them strictly one at a time, in file
//! order, appending each output line before the next row starts and
//! reporting progress after every row.
//!
//! Error policy: row-local failures (malformed records, exhausted lookups)
//! skip the row with a warning and are tallied in the [`RunSummary`]; only
//! file-access failures abort the run.

use crate::client::ZoneLookup;
use crate::error::{Error, Result};
use crate::pipeline::ConversionPipeline;
use crate::progress::ProgressReporter;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Outcome of a conversion run
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows counted in the pre-pass
    pub total_rows: u64,
    /// Rows that produced an output line
    pub converted: u64,
    /// Rows skipped because the line did not parse
    pub skipped_parse: u64,
    /// Rows skipped because every lookup attempt failed
    pub skipped_lookup: u64,
}

impl RunSummary {
    /// Total number of skipped rows, regardless of cause.
    pub fn skipped(&self) -> u64 {
        self.skipped_parse + self.skipped_lookup
    }
}

/// Sequential batch driver for the conversion pipeline
pub struct BatchRunner<L> {
    pipeline: ConversionPipeline<L>,
}

impl<L: ZoneLookup> BatchRunner<L> {
    /// Create a runner resolving zones through the given lookup.
    pub fn new(lookup: L) -> Self {
        Self {
            pipeline: ConversionPipeline::new(lookup),
        }
    }

    /// Count input rows in a single pre-pass.
    ///
    /// Every line handed over by the reader counts as one row, including a
    /// final line without a terminator. The processing loop sees exactly
    /// the same rows, so progress lands on 100% when the input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the underlying reader.
    pub async fn count_rows<R>(reader: R) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut rows = 0u64;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break;
            }
            rows += 1;
        }
        Ok(rows)
    }

    /// Convert every row from `reader`, appending output lines to `writer`.
    ///
    /// Rows are processed one at a time in input order; each output line is
    /// written and flushed before the next row is read. `progress` receives
    /// `(0, total_rows)` before the first row and `(processed, total_rows)`
    /// after every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the reader or writer fails; row-local
    /// errors are consumed and tallied instead.
    pub async fn run<R, W, P>(
        &self,
        reader: R,
        writer: &mut W,
        total_rows: u64,
        progress: &mut P,
    ) -> Result<RunSummary>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
        P: ProgressReporter,
    {
        let mut reader = BufReader::new(reader);
        let mut summary = RunSummary {
            total_rows,
            ..RunSummary::default()
        };

        progress.report(0, total_rows);

        let mut processed = 0u64;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break;
            }

            match self.pipeline.convert_line(&line).await {
                Ok(output) => {
                    writer.write_all(output.as_bytes()).await?;
                    writer.flush().await?;
                    summary.converted += 1;
                }
                Err(Error::Parse(e)) => {
                    tracing::warn!(row = processed + 1, error = %e, "skipping malformed row");
                    summary.skipped_parse += 1;
                }
                Err(Error::Lookup(e)) => {
                    tracing::warn!(row = processed + 1, error = %e, "skipping row, lookup exhausted");
                    summary.skipped_lookup += 1;
                }
                Err(Error::TimeOutOfRange {
                    timestamp,
                    offset_secs,
                }) => {
                    // The service answered with an offset too absurd to apply
                    tracing::warn!(
                        row = processed + 1,
                        %timestamp,
                        offset_secs,
                        "skipping row, unusable UTC offset"
                    );
                    summary.skipped_lookup += 1;
                }
                Err(e) => return Err(e),
            }

            processed += 1;
            progress.report(processed, total_rows);
        }

        Ok(summary)
    }

    /// Open the input and output files and run the whole batch.
    ///
    /// The input is opened twice: once for the row-count pre-pass, once for
    /// processing. The output is opened in append mode, created if absent,
    /// and held for the duration of the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when either file cannot be opened, or when
    /// reading/writing fails mid-run.
    pub async fn run_files<P>(
        &self,
        input: &Path,
        output: &Path,
        progress: &mut P,
    ) -> Result<RunSummary>
    where
        P: ProgressReporter,
    {
        let count_pass = open_input(input).await?;
        let total_rows = Self::count_rows(count_pass).await?;

        let reader = open_input(input).await?;
        let mut writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to open output file '{}': {}", output.display(), e),
                ))
            })?;

        let summary = self.run(reader, &mut writer, total_rows, progress).await?;
        writer.flush().await?;

        tracing::info!(
            total = summary.total_rows,
            converted = summary.converted,
            skipped_parse = summary.skipped_parse,
            skipped_lookup = summary.skipped_lookup,
            "conversion run complete"
        );
        Ok(summary)
    }
}

async fn open_input(input: &Path) -> Result<File> {
    File::open(input).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open input file '{}': {}", input.display(), e),
        ))
    })
}
