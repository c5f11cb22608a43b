//! Column selection and output formatting.
//!
//! Quoting is deliberately narrow: a field containing `,` is wrapped in a
//! pair of `"` and nothing else is escaped. Embedded quotes are written as-is
//! and a non-comma delimiter inside a field does not trigger quoting, so
//! output is not guaranteed to re-parse as RFC 4180 CSV.

use std::borrow::Cow;

use crate::config::SelectSpec;
use crate::error::{ColumnAccess, CsvFilterError, Result};
use crate::record::Record;

/// Wrap a field in double quotes if it contains a comma.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') {
        Cow::Owned(format!("\"{field}\""))
    } else {
        Cow::Borrowed(field)
    }
}

/// Turns records into output lines.
#[derive(Debug, Clone)]
pub struct Projection {
    select: SelectSpec,
    delimiter: char,
}

impl Projection {
    /// `delimiter` must be ASCII so the joined output uses the same single byte.
    pub fn new(select: SelectSpec, delimiter: u8) -> Self {
        debug_assert!(delimiter.is_ascii(), "delimiter {delimiter:#04x} is not ASCII");
        Self {
            select,
            delimiter: char::from(delimiter),
        }
    }

    /// The fields to emit, in output order, before quoting.
    fn pick<'r>(&self, record: &'r Record) -> Result<Vec<&'r str>> {
        if self.select.is_empty() {
            return Ok(record.fields().iter().map(String::as_str).collect());
        }
        self.select
            .columns()
            .iter()
            .map(|&column| {
                record
                    .field(column)
                    .ok_or_else(|| CsvFilterError::NotEnoughColumns {
                        line: record.line(),
                        column,
                        len: record.len(),
                        access: ColumnAccess::Select,
                    })
            })
            .collect()
    }

    /// Render one output line, without the trailing newline.
    pub fn render(&self, record: &Record) -> Result<String> {
        let fields = self.pick(record)?;
        let mut line = String::new();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            line.push_str(&quote_field(field));
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> Record {
        Record::from_fields(fields.iter().copied())
    }

    fn select(columns: &[usize]) -> SelectSpec {
        SelectSpec::new(columns.to_vec())
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field(",,"), "\",,\"");
        assert_eq!(quote_field(""), "");
    }

    #[test]
    fn test_quote_field_does_not_escape_quotes() {
        assert_eq!(quote_field("say \"hi\", ok"), "\"say \"hi\", ok\"");
        assert_eq!(quote_field("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn test_passthrough_when_select_empty() {
        let projection = Projection::new(SelectSpec::default(), b',');
        let line = projection.render(&record(&["a", "b", "c"])).unwrap();
        assert_eq!(line, "a,b,c");
    }

    #[test]
    fn test_select_reorders_and_repeats() {
        let projection = Projection::new(select(&[2, 0, 2]), b',');
        let line = projection.render(&record(&["a", "b", "c"])).unwrap();
        assert_eq!(line, "c,a,c");
    }

    #[test]
    fn test_select_narrows() {
        let projection = Projection::new(select(&[0, 2]), b',');
        assert_eq!(projection.render(&record(&["4", "5", "6"])).unwrap(), "4,6");
    }

    #[test]
    fn test_requotes_fields_with_commas() {
        let projection = Projection::new(SelectSpec::default(), b',');
        let line = projection.render(&record(&["x,y", "z"])).unwrap();
        assert_eq!(line, "\"x,y\",z");
    }

    #[test]
    fn test_other_delimiter_joins_and_only_commas_quote() {
        let projection = Projection::new(SelectSpec::default(), b';');
        let line = projection.render(&record(&["a;b", "c,d", "e"])).unwrap();
        assert_eq!(line, "a;b;\"c,d\";e");
    }

    #[test]
    fn test_tab_delimiter() {
        let projection = Projection::new(select(&[1, 0]), b'\t');
        assert_eq!(projection.render(&record(&["a", "b"])).unwrap(), "b\ta");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not ASCII")]
    fn test_non_ascii_delimiter_is_rejected() {
        Projection::new(SelectSpec::default(), 0xE9);
    }

    #[test]
    fn test_select_past_end_is_an_error() {
        let projection = Projection::new(select(&[0, 3]), b',');
        let err = projection.render(&record(&["a", "b"])).unwrap_err();
        match err {
            CsvFilterError::NotEnoughColumns {
                column,
                len,
                access,
                ..
            } => {
                assert_eq!(column, 3);
                assert_eq!(len, 2);
                assert_eq!(access, ColumnAccess::Select);
            }
            other => panic!("Expected NotEnoughColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_does_not_modify_record() {
        let input = record(&["a,b"]);
        let projection = Projection::new(SelectSpec::default(), b',');
        projection.render(&input).unwrap();
        assert_eq!(input.field(0), Some("a,b"));
    }
}
