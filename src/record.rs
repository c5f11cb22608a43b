//! A single logical input row.

use csv::StringRecord;

/// An ordered sequence of text fields, indexed from 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<String>,
    /// 1-based input line the record started on (0 if unknown).
    line: u64,
}

impl Record {
    pub fn new(fields: Vec<String>, line: u64) -> Self {
        Self { fields, line }
    }

    /// Build a record from string slices. Line is left unknown.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            line: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn line(&self) -> u64 {
        self.line
    }
}

impl From<&StringRecord> for Record {
    fn from(record: &StringRecord) -> Self {
        let line = record.position().map_or(0, |p| p.line());
        Self::new(record.iter().map(str::to_string).collect(), line)
    }
}
