//! Streaming CSV parser with incremental column type inference.
//!
//! Converts delimited text into typed rows, either in one shot
//! ([`Parser::parse_str`], [`Parser::parse_path`]) or incrementally over
//! arbitrarily chunked text fragments ([`Parser::begin_stream`],
//! [`Parser::stream`]). Fragment boundaries may split lines, quoted fields,
//! or a `\r\n` pair; the session buffers unterminated text and emits a
//! growing [`ParseResult`] snapshot after each fragment that yields new rows.
//! Column types start from header evidence and only ever widen as data
//! arrives, so consecutive snapshots are monotonic.
//!
//! ```
//! use csv_typed::{ParseOptions, Parser};
//!
//! let parser = Parser::new(ParseOptions::default())?;
//! let result = parser.parse_str("name,age\nJohn,30\n");
//! assert_eq!(result.header, vec!["name", "age"]);
//! assert_eq!(result.rows.len(), 1);
//! # Ok::<(), csv_typed::Error>(())
//! ```

pub mod data;
pub mod detect;
pub mod error;
pub mod io_utils;
pub mod options;
pub mod parse;
pub mod schema;
pub mod stream;
pub mod tokenize;

pub use data::{ParseResult, Row, Value};
pub use detect::{CellType, FormatMatcher, NumberFormat, TypedCell, detect};
pub use error::{Error, Result};
pub use options::{DateFormats, ParseOptions, RowMode};
pub use parse::Parser;
pub use schema::ColumnDescriptor;
pub use stream::{Snapshots, StreamSession};
pub use tokenize::{split_lines, tokenize};
