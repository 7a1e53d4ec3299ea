//! Command-line entry point.
//!
//! ```sh
//! comment_ranking -o ./data
//! ```
//!
//! Exit status is 0 when the run completed (including lenient runs with
//! failed genres) and 1 when it was aborted or could not start.

use clap::Parser;
use comment_ranking::cli::Cli;
use comment_ranking::clock::{CaptureStamp, SystemClock};
use comment_ranking::config::{FileConfig, Settings};
use comment_ranking::fetch::HttpFetcher;
use comment_ranking::scheduler::{self, RunReport};
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("comment_ranking starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let status = match run(&args).await {
        Ok(report) => {
            info!(
                written = report.written(),
                no_data = report.no_data(),
                failed = report.failed(),
                state = ?report.state,
                "Run finished"
            );
            report.exit_status()
        }
        Err(e) => {
            error!(error = %e, "Process stopped due to error");
            1
        }
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    ExitCode::from(status)
}

async fn run(args: &Cli) -> Result<RunReport, Box<dyn Error>> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args, file)?;
    let fetcher = HttpFetcher::new(&settings.user_agent, settings.timeout)?;

    // one stamp for every row and file name of this run
    let stamp = CaptureStamp::capture(&SystemClock);
    info!(
        capture_date = %stamp.date_column(),
        capture_time = %stamp.time_column(),
        root = %settings.writer.day_dir(&stamp).display(),
        genres = settings.genres.len(),
        "Capture started"
    );

    Ok(scheduler::run(&fetcher, &settings, &stamp).await)
}
