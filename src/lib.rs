//! # csvfilter
//!
//! A streaming row filter and column projector for delimited records.
//!
//! ## Overview
//!
//! Records are processed one at a time:
//! - **Filter**: every `column=value` constraint must match exactly
//! - **Header pass-through**: the first record is always emitted
//! - **Select**: output columns are picked and ordered by index
//! - **Re-quote**: fields containing a comma are wrapped in double quotes
//!
//! ## Example
//!
//! ```
//! use csvfilter::{Config, Driver, Filter, SelectSpec};
//!
//! let config = Config {
//!     filters: vec![Filter::new(1, "5")],
//!     select: SelectSpec::new(vec![0, 2]),
//!     ..Config::default()
//! };
//!
//! let mut output = Vec::new();
//! Driver::new(config)
//!     .run("a,b,c\n1,2,3\n4,5,6\n".as_bytes(), &mut output)
//!     .unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "a,c\n4,6\n");
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod projector;
pub mod record;
pub mod source;

pub use cli::Cli;
pub use config::{Config, Filter, SelectSpec, parse_delimiter, parse_filter, parse_select};
pub use driver::{Driver, RunSummary};
pub use error::{ColumnAccess, CsvFilterError, SpecError};
pub use filter::passes;
pub use projector::{Projection, quote_field};
pub use record::Record;
pub use source::RecordSource;
