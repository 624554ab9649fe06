//! Incremental parsing over a sequence of text fragments.
//!
//! A [`StreamSession`] owns all per-session state: the pending buffer of
//! unterminated text, the schema tracker, and the accumulated rows. Fragments
//! arrive with arbitrary boundaries; only text up to the last unambiguous
//! line terminator is processed, the remainder stays buffered. Each fragment
//! that yields new rows (or first establishes the schema) produces an owned
//! snapshot of the accumulated result, so snapshots grow monotonically: rows
//! are append-only and column types only widen.
//!
//! [`Snapshots`] adapts a fragment iterator into a snapshot iterator. The
//! pull model is the backpressure story: nothing is parsed until the consumer
//! asks, and dropping the iterator cancels the session. Reaching the
//! configured row limit stops fragment pulls and discards buffered text.

use std::{collections::BTreeMap, io};

use itertools::Itertools;
use log::debug;

use crate::{
    data::{ParseResult, Row, Value},
    detect::{TypedCell, detect},
    options::RowMode,
    parse::Parser,
    schema::SchemaTracker,
    tokenize::{split_lines, tokenize},
};

/// Index of the last line terminator that is safe to act on. A trailing lone
/// `\r` may be the first half of `\r\n`, so it only counts once the next
/// byte is known.
fn last_unambiguous_terminator(buffer: &str) -> Option<usize> {
    let bytes = buffer.as_bytes();
    let mut idx = bytes.len();
    while idx > 0 {
        idx -= 1;
        match bytes[idx] {
            b'\n' => return Some(idx),
            b'\r' if idx + 1 < bytes.len() => return Some(idx),
            _ => {}
        }
    }
    None
}

/// One incremental parse session. Created by
/// [`Parser::begin_stream`](crate::Parser::begin_stream); never shared across
/// concurrent sessions — each session owns its state outright.
#[derive(Debug)]
pub struct StreamSession<'a> {
    parser: &'a Parser,
    buffer: String,
    tracker: SchemaTracker,
    header: Vec<String>,
    rows: Vec<Row>,
    header_consumed: bool,
    limit_reached: bool,
}

impl<'a> StreamSession<'a> {
    pub(crate) fn new(parser: &'a Parser) -> Self {
        Self {
            parser,
            buffer: String::new(),
            tracker: SchemaTracker::new(),
            header: Vec::new(),
            rows: Vec::new(),
            header_consumed: false,
            limit_reached: false,
        }
    }

    /// Feeds one fragment. Returns a snapshot of the accumulated result when
    /// the fragment produced at least one new row or first established the
    /// schema; `None` when everything stayed buffered or filtered. After the
    /// row limit trips, pushes are no-ops.
    pub fn push(&mut self, fragment: &str) -> Option<ParseResult> {
        if self.advance(fragment) {
            Some(self.snapshot())
        } else {
            None
        }
    }

    /// Flushes any unterminated trailing text as one final complete line.
    /// Returns a snapshot under the same emission rule as [`push`].
    ///
    /// [`push`]: StreamSession::push
    pub fn finish(&mut self) -> Option<ParseResult> {
        if self.flush_pending() {
            Some(self.snapshot())
        } else {
            None
        }
    }

    /// True once the configured row limit has terminated the session.
    pub fn is_done(&self) -> bool {
        self.limit_reached
    }

    /// Rows accumulated so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Owned copy of the accumulated result.
    pub fn snapshot(&self) -> ParseResult {
        ParseResult {
            columns: self.tracker.columns().to_vec(),
            header: self.header.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Flushes pending text and concludes the session.
    pub fn into_result(mut self) -> ParseResult {
        self.flush_pending();
        ParseResult {
            columns: self.tracker.into_columns(),
            header: self.header,
            rows: self.rows,
        }
    }

    pub(crate) fn advance(&mut self, fragment: &str) -> bool {
        if self.limit_reached {
            return false;
        }
        self.buffer.push_str(fragment);
        let Some(cut) = last_unambiguous_terminator(&self.buffer) else {
            return false;
        };
        let processable: String = self.buffer.drain(..=cut).collect();
        self.ingest(&processable)
    }

    pub(crate) fn flush_pending(&mut self) -> bool {
        if self.limit_reached || self.buffer.is_empty() {
            self.buffer.clear();
            return false;
        }
        let pending = std::mem::take(&mut self.buffer);
        self.ingest(&pending)
    }

    fn ingest(&mut self, text: &str) -> bool {
        let opts = self.parser.options();
        let mut changed = false;

        for line in split_lines(text) {
            let trimmed = line.trim();
            if trimmed.is_empty() || opts.is_comment(trimmed) {
                continue;
            }

            if opts.has_headers && !self.header_consumed {
                let fields = tokenize(line, opts.delimiter, opts.quote);
                self.tracker.establish_from_header(&fields);
                self.header = fields;
                self.header_consumed = true;
                changed = true;
                debug!(
                    "Established schema with {} column(s) from header row",
                    self.header.len()
                );
                continue;
            }

            if let Some(max) = opts.max_rows
                && self.rows.len() >= max
            {
                self.limit_reached = true;
                break;
            }

            let fields = tokenize(line, opts.delimiter, opts.quote);
            let cells: Vec<TypedCell> = fields
                .iter()
                .map(|field| detect(field, self.parser.formats()))
                .collect();
            self.tracker.observe_row(&cells);
            let row = self.assemble_row(&cells);
            self.rows.push(row);
            changed = true;

            if let Some(max) = opts.max_rows
                && self.rows.len() >= max
            {
                self.limit_reached = true;
                break;
            }
        }

        if self.limit_reached {
            // Remaining buffered text is discarded; the session is over.
            self.buffer.clear();
            debug!("Row limit reached after {} row(s)", self.rows.len());
        }
        changed
    }

    fn assemble_row(&self, cells: &[TypedCell]) -> Row {
        let header_len = self.header.len();
        match self.parser.options().row_mode {
            RowMode::Array => {
                let values: Vec<Value> = cells
                    .iter()
                    .map(|cell| cell.value.clone())
                    .pad_using(header_len, |_| Value::empty())
                    .collect();
                Row::Array(values)
            }
            RowMode::Object => {
                let columns = self.tracker.columns();
                let mut map = BTreeMap::new();
                for (index, cell) in cells.iter().enumerate() {
                    map.insert(columns[index].name.clone(), cell.value.clone());
                }
                // Header names the row did not cover get an empty string,
                // not null and not omission.
                for column in columns.iter().take(header_len).skip(cells.len()) {
                    map.entry(column.name.clone()).or_insert_with(Value::empty);
                }
                Row::Object(map)
            }
        }
    }
}

/// Iterator of accumulated-result snapshots over a fragment source.
///
/// Upstream read errors propagate once and end the session; no snapshots are
/// emitted after a source failure. End of input flushes the pending buffer.
#[derive(Debug)]
pub struct Snapshots<'a, I> {
    session: StreamSession<'a>,
    fragments: I,
    finished: bool,
}

impl<'a, I> Snapshots<'a, I> {
    pub(crate) fn new(session: StreamSession<'a>, fragments: I) -> Self {
        Self {
            session,
            fragments,
            finished: false,
        }
    }
}

impl<'a, I> Snapshots<'a, I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Drains the remaining fragments and hands back the final accumulated
    /// result, propagating the first source error if one occurs.
    pub fn into_result(mut self) -> crate::Result<ParseResult> {
        while let Some(item) = self.next() {
            item?;
        }
        Ok(self.session.into_result())
    }
}

impl<'a, I> Iterator for Snapshots<'a, I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = crate::Result<ParseResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.fragments.next() {
                Some(Ok(fragment)) => {
                    let emitted = self.session.push(&fragment);
                    if self.session.is_done() {
                        self.finished = true;
                    }
                    match emitted {
                        Some(snapshot) => return Some(Ok(snapshot)),
                        None if self.finished => return None,
                        None => continue,
                    }
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.finished = true;
                    return self.session.finish().map(Ok);
                }
            }
        }
    }
}
