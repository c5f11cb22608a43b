//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, Filter, SelectSpec, parse_delimiter, parse_filter, parse_select};

/// Filter delimited records by column value and project selected columns.
///
/// The first record is always written, so a header line survives filters.
#[derive(Parser, Debug)]
#[command(name = "csvfilter")]
#[command(version)]
pub struct Cli {
    /// Keep records whose COLUMN equals VALUE (repeatable, all must match)
    #[arg(
        long = "filter",
        value_name = "COLUMN=VALUE",
        value_parser = parse_filter,
        allow_hyphen_values = true
    )]
    pub filters: Vec<Filter>,

    /// Output only these columns, in this order (repeatable, accumulates)
    #[arg(
        long = "select",
        value_name = "C1,C2,...",
        value_parser = parse_select,
        allow_hyphen_values = true
    )]
    pub select: Vec<SelectSpec>,

    /// Print the index and value of every field in the first record, then exit
    #[arg(long)]
    pub enumheader: bool,

    /// Field delimiter for input and output (single ASCII character, \t for tab)
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Input file (default: stdin, or "-")
    pub input: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report record counts on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    /// The run configuration these arguments describe.
    pub fn config(&self) -> Config {
        Config {
            filters: self.filters.clone(),
            select: self.select.iter().cloned().collect(),
            enum_header: self.enumheader,
            delimiter: self.delimiter,
        }
    }
}
