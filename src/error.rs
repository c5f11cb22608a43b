//! Error types for configuration parsing and record processing.

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// Errors raised while parsing `--filter`, `--select` and `--delimiter` values.
///
/// `MalformedSpec` is a shape error the argument parser reports as a usage
/// message. The remaining variants are value errors: a run is never started
/// with a column index that failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A filter that does not split into exactly `column` and `value` on `=`.
    #[error("wrong format '{0}': expected COLUMN=VALUE with a single '='")]
    MalformedSpec(String),

    /// A column token that is not a base-10 integer.
    #[error("invalid column number '{token}': {source}")]
    NotANumber {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// A column index below zero.
    #[error("column number has to be >= 0, got {0}")]
    InvalidIndex(i64),

    /// A delimiter that is not a single ASCII character, or is `"`, `\n` or `\r`.
    #[error("delimiter must be a single ASCII character other than '\"' or a line break, got '{0}'")]
    InvalidDelimiter(String),
}

/// Which part of the engine touched a column past the end of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAccess {
    Filter,
    Select,
}

impl fmt::Display for ColumnAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnAccess::Filter => f.write_str("filter"),
            ColumnAccess::Select => f.write_str("select"),
        }
    }
}

/// How a field's quoting breaks the strict quoting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFault {
    /// A `"` inside a field that did not start with one.
    BareQuote,
    /// A closing `"` followed by something other than a delimiter or line end.
    ExtraneousQuote,
    /// A quoted field still open at end of input.
    UnterminatedQuote,
}

impl fmt::Display for QuoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteFault::BareQuote => f.write_str("bare \" in non-quoted field"),
            QuoteFault::ExtraneousQuote => f.write_str("extraneous \" in quoted field"),
            QuoteFault::UnterminatedQuote => f.write_str("missing closing \" in quoted field"),
        }
    }
}

/// The error type returned by a run.
///
/// Every variant aborts the run: there is no per-record recovery.
#[derive(Error, Debug)]
pub enum CsvFilterError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// The tokenizer rejected the input (ragged rows, invalid UTF-8).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record with a misplaced or unterminated quote.
    #[error("malformed record on line {line}: {fault}")]
    MalformedQuote { line: u64, fault: QuoteFault },

    /// A filter or select index does not exist in the current record.
    #[error(
        "not enough columns on line {line}: {access} references column {column} \
         but the record has {len} fields"
    )]
    NotEnoughColumns {
        line: u64,
        column: usize,
        len: usize,
        access: ColumnAccess,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvFilterError {
    /// True when the reader on the other end of the output went away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, CsvFilterError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

pub type Result<T> = std::result::Result<T, CsvFilterError>;
