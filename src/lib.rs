//! # tzconvert
//!
//! Batch CSV time-zone enrichment library.
//!
//! tzconvert reads rows of `YYYYMMDDHHMMSS<lat>,<lng>` records, resolves each
//! coordinate to a time zone through a remote lookup service, and appends one
//! enriched line per row: the coordinate, the zone name, and the
//! zone-corrected local timestamp.
//!
//! ## Design Philosophy
//!
//! - **Sequential by contract** - rows are processed one at a time, in file
//!   order, each written before the next is read
//! - **Fault-isolated lookups** - every lookup attempt runs on its own
//!   transport session with a bounded retry ceiling and per-attempt deadline
//! - **Row-local failures** - a malformed row or an exhausted lookup skips
//!   that row and is counted; only file-access errors abort a run
//! - **Library-first** - the batch engine is embeddable and fully testable
//!   without a network or a console
//!
//! ## Quick Start
//!
//! ```no_run
//! use tzconvert::{BatchRunner, Config, ConsoleProgress, TimeZoneClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.lookup.api_key = "YOUR_KEY".to_string();
//!
//!     let client = TimeZoneClient::new(config.lookup, config.retry)?;
//!     let runner = BatchRunner::new(client);
//!
//!     let summary = runner
//!         .run_files(&config.input_path, &config.output_path, &mut ConsoleProgress::new())
//!         .await?;
//!
//!     println!("\nconverted {} of {} rows", summary.converted, summary.total_rows);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Time-zone lookup client and trait
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// UTC-offset application and local-time formatting
pub mod localtime;
/// Per-row conversion pipeline
pub mod pipeline;
/// Progress reporting
pub mod progress;
/// Input record parsing
pub mod record;
/// Lookup request construction
pub mod request;
/// Retry logic with exponential backoff
pub mod retry;
/// Batch execution
pub mod runner;

// Re-export commonly used types
pub use client::{TimeZoneClient, TimeZoneResult, ZoneLookup};
pub use config::{Config, LookupConfig, RetryConfig};
pub use error::{Error, LookupError, ParseError, Result};
pub use pipeline::ConversionPipeline;
pub use progress::{ConsoleProgress, NoOpProgress, ProgressReporter};
pub use record::InputRecord;
pub use runner::{BatchRunner, RunSummary};
