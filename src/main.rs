//! CLI tool to filter and project delimited records.
//!
//! Usage:
//!   csvfilter [--filter C=V]... [--select C1,C2]... [--enumheader] [INPUT] [-o OUTPUT]
//!
//! Reads stdin when no input file is given and writes stdout when no output
//! file is given.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use csvfilter::{Cli, Driver};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input: Box<dyn Read> = match cli.input_path() {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("csvfilter: error reading input file '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!(
                    "csvfilter: error creating output file '{}': {e}",
                    path.display()
                );
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    let driver = Driver::new(cli.config());
    if cli.verbose {
        let config = driver.config();
        for filter in &config.filters {
            eprintln!("Filter:   {filter}");
        }
        eprintln!("Select:   {}", config.select);
    }

    match driver.run(input, output) {
        Ok(summary) => {
            if cli.verbose {
                eprintln!(
                    "Records:  {} in -> {} out",
                    summary.records_read, summary.records_written
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_broken_pipe() => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csvfilter: {e}");
            ExitCode::FAILURE
        }
    }
}
