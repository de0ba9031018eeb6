//! Console front-end: converts `input.csv` to `output.csv` in the current
//! directory, rendering the progress bar and a run summary.
//!
//! The lookup API key is read from the `TIMEZONEDB_API_KEY` environment
//! variable (a `.env` file is honored when present).

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tzconvert::{BatchRunner, Config, ConsoleProgress, TimeZoneClient};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; absence is not an error
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default();
    if let Ok(key) = std::env::var("TIMEZONEDB_API_KEY") {
        config.lookup.api_key = key;
    }

    println!();
    println!(">>>   Time zone converter v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("File \"{}\" opened", config.input_path.display());
    println!();

    let client = match TimeZoneClient::new(config.lookup.clone(), config.retry.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let runner = BatchRunner::new(client);
    let mut progress = ConsoleProgress::new();

    match runner
        .run_files(&config.input_path, &config.output_path, &mut progress)
        .await
    {
        Ok(summary) => {
            println!();
            println!();
            println!(
                "Conversion completed: {} / {} rows converted, {} skipped",
                summary.converted,
                summary.total_rows,
                summary.skipped()
            );
            println!();
            println!("File \"{}\" saved", config.output_path.display());
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!();
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
