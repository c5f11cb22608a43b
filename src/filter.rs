//! Conjunctive equality filtering.

use crate::config::Filter;
use crate::error::{ColumnAccess, CsvFilterError, Result};
use crate::record::Record;

/// Returns `Ok(true)` when every filter matches the record exactly.
///
/// Filters are checked in order and evaluation stops at the first mismatch.
/// A filter whose column is not present in the record is an error, not a
/// mismatch. An empty filter set always passes.
pub fn passes(record: &Record, filters: &[Filter]) -> Result<bool> {
    for filter in filters {
        if record.len() <= filter.column {
            return Err(CsvFilterError::NotEnoughColumns {
                line: record.line(),
                column: filter.column,
                len: record.len(),
                access: ColumnAccess::Filter,
            });
        }
        if record.fields()[filter.column] != filter.value {
            return Ok(false);
        }
    }
    Ok(true)
}
