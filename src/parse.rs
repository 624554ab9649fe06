//! Parser front door: one configuration, any number of parse sessions.
//!
//! A [`Parser`] is immutable after construction (options plus compiled date
//! format templates), so one instance can drive sequential or concurrent
//! sessions without shared mutable state. Batch parsing runs the exact same
//! pipeline as streaming, as a single-fragment session.

use std::{io::Read, path::Path};

use log::info;

use crate::{
    data::ParseResult,
    detect::FormatMatcher,
    error::Result,
    io_utils,
    options::ParseOptions,
    stream::{Snapshots, StreamSession},
};

#[derive(Debug)]
pub struct Parser {
    options: ParseOptions,
    formats: Option<FormatMatcher>,
}

impl Parser {
    /// Builds a parser, compiling any configured date format templates.
    pub fn new(options: ParseOptions) -> Result<Self> {
        let formats = options
            .date_formats
            .as_ref()
            .map(FormatMatcher::new)
            .transpose()?;
        Ok(Self { options, formats })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub(crate) fn formats(&self) -> Option<&FormatMatcher> {
        self.formats.as_ref()
    }

    /// Parses a complete in-memory text. Never fails: any input, including
    /// the empty string, yields a well-formed (possibly empty) result.
    pub fn parse_str(&self, text: &str) -> ParseResult {
        let mut session = self.begin_stream();
        session.advance(text);
        session.into_result()
    }

    /// Reads an entire file as text with the configured encoding, then
    /// batch-parses it. An unreadable file is the one hard-failure path; no
    /// partial result is returned.
    pub fn parse_path(&self, path: &Path) -> Result<ParseResult> {
        let encoding = io_utils::resolve_encoding(self.options.encoding.as_deref())?;
        let text = io_utils::read_to_string(path, encoding)?;
        let result = self.parse_str(&text);
        info!(
            "Parsed {:?}: {} column(s), {} row(s)",
            path,
            result.columns.len(),
            result.rows.len()
        );
        Ok(result)
    }

    /// Reads an entire file-like object as text with the configured encoding,
    /// then batch-parses it.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParseResult> {
        let encoding = io_utils::resolve_encoding(self.options.encoding.as_deref())?;
        let text = io_utils::read_reader_to_string(reader, encoding)?;
        Ok(self.parse_str(&text))
    }

    /// Begins an incremental parse session. Each session owns its state; a
    /// parser may drive any number of them.
    pub fn begin_stream(&self) -> StreamSession<'_> {
        StreamSession::new(self)
    }

    /// Adapts a fragment source into an iterator of accumulated-result
    /// snapshots.
    pub fn stream<I>(&self, fragments: I) -> Snapshots<'_, I::IntoIter>
    where
        I: IntoIterator<Item = std::io::Result<String>>,
    {
        Snapshots::new(self.begin_stream(), fragments.into_iter())
    }
}
