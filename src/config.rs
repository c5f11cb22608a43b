//! Run configuration and the two flag mini-languages.
//!
//! Filter format:
//! ```text
//! <column>=<value>      e.g. 3=SALES
//! ```
//!
//! Select format:
//! ```text
//! <c1>,<c2>,...         e.g. 0,2,5
//! ```
//!
//! Columns are 0-based. A filter value is taken verbatim and must not
//! contain `=`. Select indices may repeat and need not be ascending.

use std::fmt;

use crate::error::SpecError;

/// One equality constraint: `record[column] == value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: usize,
    pub value: String,
}

impl Filter {
    pub fn new(column: usize, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Ordered output columns. Empty means "emit the whole record".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectSpec {
    columns: Vec<usize>,
}

impl SelectSpec {
    pub fn new(columns: Vec<usize>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append another spec's columns after this one's.
    pub fn extend(&mut self, other: SelectSpec) {
        self.columns.extend(other.columns);
    }
}

impl FromIterator<SelectSpec> for SelectSpec {
    fn from_iter<I: IntoIterator<Item = SelectSpec>>(iter: I) -> Self {
        let mut merged = SelectSpec::default();
        for spec in iter {
            merged.extend(spec);
        }
        merged
    }
}

impl fmt::Display for SelectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{column}")?;
        }
        f.write_str("]")
    }
}

/// Everything a run needs, built once before the first record is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub filters: Vec<Filter>,
    pub select: SelectSpec,
    pub enum_header: bool,
    /// Input field delimiter; output fields are joined with the same byte.
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            select: SelectSpec::default(),
            enum_header: false,
            delimiter: b',',
        }
    }
}

/// Parse a base-10 column index, rejecting negatives.
fn parse_column(token: &str) -> Result<usize, SpecError> {
    let column: i64 = token.parse().map_err(|source| SpecError::NotANumber {
        token: token.to_string(),
        source,
    })?;
    if column < 0 {
        return Err(SpecError::InvalidIndex(column));
    }
    usize::try_from(column).map_err(|_| SpecError::InvalidIndex(column))
}

/// Parse `--filter` text.
pub fn parse_filter(text: &str) -> Result<Filter, SpecError> {
    let parts: Vec<&str> = text.split('=').collect();
    if parts.len() != 2 {
        return Err(SpecError::MalformedSpec(text.to_string()));
    }
    let column = parse_column(parts[0])?;
    Ok(Filter::new(column, parts[1]))
}

/// Parse `--select` text.
pub fn parse_select(text: &str) -> Result<SelectSpec, SpecError> {
    let columns = text
        .split(',')
        .map(parse_column)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SelectSpec::new(columns))
}

/// Parse `--delimiter` text into a single byte. `\t` is accepted for tab.
///
/// The quote character and line terminators are rejected.
pub fn parse_delimiter(text: &str) -> Result<u8, SpecError> {
    if text == "\\t" {
        return Ok(b'\t');
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => Ok(c as u8),
        _ => Err(SpecError::InvalidDelimiter(text.to_string())),
    }
}
