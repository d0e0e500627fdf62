#![warn(clippy::uninlined_format_args)]

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::Args;
use commands::Trip;
use config::AppConfig;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    // `.env` must be loaded before RUST_LOG is read.
    let config = AppConfig::from_env(args.home.clone());
    init_logging(args.verbose);

    match config.and_then(|config| run(config, args)) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: AppConfig, args: Args) -> anyhow::Result<String> {
    let trip = Trip::open(config);
    tracing::debug!(home = %trip.home().display(), "Opened trip directory");
    trip.run(args.command)
}

/// RUST_LOG wins when set; otherwise `-v` flags pick the level.
fn init_logging(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
