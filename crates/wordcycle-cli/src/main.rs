//! wordcycle - command-line front end for the practice tracker.
//!
//! Reads configuration from `--config`, then `WORDCYCLE_*` environment
//! variables (a `.env` file is loaded first), then `--db`. Results are printed
//! as JSON on stdout; logs go to stderr and are filtered with `RUST_LOG`.
//!
//! ```text
//! wordcycle status   --user 1 --word 42
//! wordcycle practice --user 1 --word 42
//! wordcycle due      --user 1
//! wordcycle history  --user 1 [--word 42]
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wordcycle_core::TrackerError;

mod commands;

use commands::{load_config, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Keep stdout clean for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match execute(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TrackerError>() {
                Some(tracker_err) => {
                    eprintln!("error [{}]: {}", tracker_err.code().as_str(), tracker_err);
                    if let Some(suggestion) = tracker_err.suggestion() {
                        eprintln!("hint: {}", suggestion);
                    }
                }
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    info!(path = %config.database_path.display(), in_memory = config.in_memory, "Opening tracker");
    let tracker = config.open_tracker()?;
    run(&tracker, cli.command).await
}
