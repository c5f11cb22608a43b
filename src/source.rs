//! Lazy record source over a delimited text stream.
//!
//! Tokenization is delegated to the `csv` crate. The first row is an ordinary
//! record (no header handling here), quoted fields may contain the delimiter,
//! blank lines are skipped, and every row must have the same number of fields
//! as the first one.
//!
//! Quoting is strict. A `"` may only open a field, close it, or be doubled
//! inside a quoted field; anything else fails the record that contains it.
//! The bytes are checked by `QuoteCheck` as the tokenizer pulls them in.

use std::cell::Cell;
use std::io::{self, Read};
use std::rc::Rc;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::error::{CsvFilterError, QuoteFault, Result};
use crate::record::Record;

/// First quoting fault seen in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuoteViolation {
    /// Byte offset of the offending `"` or character.
    offset: u64,
    line: u64,
    fault: QuoteFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    /// Just saw a `"` inside a quoted field: a close or the first half of `""`.
    QuoteInQuoted,
}

/// Pass-through reader that records the first quoting violation.
struct QuoteCheck<R> {
    inner: R,
    delimiter: u8,
    state: FieldState,
    offset: u64,
    line: u64,
    /// Where the currently open quoted field began.
    open_quote: (u64, u64),
    violation: Rc<Cell<Option<QuoteViolation>>>,
}

impl<R: Read> QuoteCheck<R> {
    fn new(inner: R, delimiter: u8, violation: Rc<Cell<Option<QuoteViolation>>>) -> Self {
        Self {
            inner,
            delimiter,
            state: FieldState::Start,
            offset: 0,
            line: 1,
            open_quote: (0, 1),
            violation,
        }
    }

    fn flag(&self, offset: u64, line: u64, fault: QuoteFault) {
        if self.violation.get().is_none() {
            self.violation.set(Some(QuoteViolation {
                offset,
                line,
                fault,
            }));
        }
    }

    fn scan(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let ends_field = b == self.delimiter || b == b'\n' || b == b'\r';
            self.state = match self.state {
                FieldState::Start if b == b'"' => {
                    self.open_quote = (self.offset, self.line);
                    FieldState::Quoted
                }
                FieldState::Start | FieldState::Unquoted if ends_field => FieldState::Start,
                FieldState::Start => FieldState::Unquoted,
                FieldState::Unquoted => {
                    if b == b'"' {
                        self.flag(self.offset, self.line, QuoteFault::BareQuote);
                    }
                    FieldState::Unquoted
                }
                FieldState::Quoted if b == b'"' => FieldState::QuoteInQuoted,
                FieldState::Quoted => FieldState::Quoted,
                FieldState::QuoteInQuoted if b == b'"' => FieldState::Quoted,
                FieldState::QuoteInQuoted if ends_field => FieldState::Start,
                FieldState::QuoteInQuoted => {
                    self.flag(self.offset, self.line, QuoteFault::ExtraneousQuote);
                    FieldState::Unquoted
                }
            };
            if b == b'\n' {
                self.line += 1;
            }
            self.offset += 1;
        }
    }
}

impl<R: Read> Read for QuoteCheck<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            if self.state == FieldState::Quoted {
                let (offset, line) = self.open_quote;
                self.flag(offset, line, QuoteFault::UnterminatedQuote);
            }
        } else {
            self.scan(&buf[..n]);
        }
        Ok(n)
    }
}

/// Single forward pass over the records of an input stream.
pub struct RecordSource<R> {
    reader: Reader<QuoteCheck<R>>,
    delimiter: u8,
    buffer: StringRecord,
    violation: Rc<Cell<Option<QuoteViolation>>>,
    failed: bool,
}

impl<R: Read> RecordSource<R> {
    pub fn new(input: R, delimiter: u8) -> Self {
        let violation = Rc::new(Cell::new(None));
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(false)
            .from_reader(QuoteCheck::new(input, delimiter, Rc::clone(&violation)));
        Self {
            reader,
            delimiter,
            buffer: StringRecord::new(),
            violation,
            failed: false,
        }
    }

    /// The delimiter records are split on.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// A violation inside the bytes consumed so far, i.e. in the record just read.
    fn quote_error(&self) -> Option<CsvFilterError> {
        let consumed = self.reader.position().byte();
        self.violation
            .get()
            .filter(|v| v.offset < consumed)
            .map(|v| CsvFilterError::MalformedQuote {
                line: v.line,
                fault: v.fault,
            })
    }
}

impl<R: Read> Iterator for RecordSource<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let read = self.reader.read_record(&mut self.buffer);
        if let Some(err) = self.quote_error() {
            self.failed = true;
            return Some(Err(err));
        }
        match read {
            Ok(true) => Some(Ok(Record::from(&self.buffer))),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str, delimiter: u8) -> Vec<Result<Record>> {
        RecordSource::new(input.as_bytes(), delimiter).collect()
    }

    fn quote_fault(result: &Result<Record>) -> Option<(u64, QuoteFault)> {
        match result {
            Err(CsvFilterError::MalformedQuote { line, fault }) => Some((*line, *fault)),
            _ => None,
        }
    }

    #[test]
    fn test_reads_records_in_order() {
        let records: Vec<Record> = read_all("a,b,c\n1,2,3\n", b',')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields(), &["a", "b", "c"]);
        assert_eq!(records[1].fields(), &["1", "2", "3"]);
    }

    #[test]
    fn test_tracks_line_numbers() {
        let records: Vec<Record> = read_all("a,b\n1,2\n3,4\n", b',')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(records[0].line(), 1);
        assert_eq!(records[2].line(), 3);
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let records = read_all("\"x,y\",z\n", b',');
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.fields(), &["x,y", "z"]);
    }

    #[test]
    fn test_doubled_quotes_and_newlines_inside_quotes() {
        let records = read_all("a,b\n\"say \"\"hi\"\"\",\"two\nlines\"\n", b',');
        assert_eq!(records.len(), 2);
        let record = records[1].as_ref().unwrap();
        assert_eq!(record.fields(), &["say \"hi\"", "two\nlines"]);
    }

    #[test]
    fn test_quoted_fields_with_crlf() {
        let records = read_all("\"a\",\"b\"\r\n\"1\",\"2\"\r\n", b',');
        assert!(records.iter().all(|r| r.is_ok()));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_custom_delimiter() {
        let source = RecordSource::new("a;b\n1;2\n".as_bytes(), b';');
        assert_eq!(source.delimiter(), b';');
        let records: Vec<Record> = source.map(|r| r.unwrap()).collect();
        assert_eq!(records[1].fields(), &["1", "2"]);
    }

    #[test]
    fn test_quoted_field_closed_by_custom_delimiter() {
        let records = read_all("\"a;b\";c\n", b';');
        assert_eq!(records[0].as_ref().unwrap().fields(), &["a;b", "c"]);
    }

    #[test]
    fn test_skips_blank_lines() {
        let records = read_all("a,b\n\n1,2\n", b',');
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_all("", b',').is_empty());
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let records = read_all("a,b,c\n1,2\n", b',');
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(CsvFilterError::Csv(_))));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let input: &[u8] = b"a,\xff\n";
        let mut source = RecordSource::new(input, b',');
        assert!(matches!(source.next(), Some(Err(CsvFilterError::Csv(_)))));
    }

    #[test]
    fn test_bare_quote_in_unquoted_field() {
        let mut source = RecordSource::new("a,b\n1,x\"y\n".as_bytes(), b',');
        assert!(source.next().unwrap().is_ok());
        let second = source.next().unwrap();
        assert_eq!(quote_fault(&second), Some((2, QuoteFault::BareQuote)));
    }

    #[test]
    fn test_text_after_closing_quote() {
        let mut source = RecordSource::new("a,b\n1,\"x\"y\n".as_bytes(), b',');
        assert!(source.next().unwrap().is_ok());
        let second = source.next().unwrap();
        assert_eq!(quote_fault(&second), Some((2, QuoteFault::ExtraneousQuote)));
    }

    #[test]
    fn test_unterminated_quote_at_end_of_input() {
        let mut source = RecordSource::new("a,b\n1,\"2\n".as_bytes(), b',');
        assert!(source.next().unwrap().is_ok());
        let second = source.next().unwrap();
        assert_eq!(
            quote_fault(&second),
            Some((2, QuoteFault::UnterminatedQuote))
        );
    }

    #[test]
    fn test_quote_fault_in_first_record() {
        let records = read_all(" \"a\",b\n", b',');
        assert_eq!(quote_fault(&records[0]), Some((1, QuoteFault::BareQuote)));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_quote_fault_after_many_good_records() {
        let mut input = String::from("k,v\n");
        for i in 0..2000 {
            input.push_str(&format!("{i},value{i}\n"));
        }
        input.push_str("bad,x\"y\n");
        let records: Vec<Result<Record>> = read_all(&input, b',');
        assert_eq!(records.len(), 2002);
        assert!(records[..2001].iter().all(|r| r.is_ok()));
        assert_eq!(
            quote_fault(&records[2001]),
            Some((2002, QuoteFault::BareQuote))
        );
    }
}
