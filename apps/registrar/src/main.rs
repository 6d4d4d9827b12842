//! Registrar - course enrollment console.
//!
//! ```bash
//! # Interactive menu over ./students.csv, ./courses.csv, ./advisors.csv
//! registrar
//!
//! # JSON records in another directory, course table as JSON
//! registrar --data-dir ./records --format json --json courses
//!
//! # Batch operations
//! registrar run enrollments.txt
//! ```

use clap::Parser;
use registrar::cli::{dispatch, Cli};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match dispatch(&cli, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
