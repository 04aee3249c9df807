//! Record and field scanning over concatenated named byte sources.
//!
//! The scanner turns a stream of raw bytes into records and fields using
//! configurable regular-expression separators, and keeps the counters the
//! language runtime observes through `NR`, `NF`, `FNR` and `FILENAME`. All
//! work is driven synchronously by the host calling [`Scanner::scan`].

mod line;
mod source;

pub use line::{Line, LineReader, RxLineReader, SimpleLineReader};
pub use source::{MultiSource, NamedReader, ReadResult, Source};

use regex::Regex;
use regex::bytes;

use crate::error::Error;

/// Splits input into records and records into fields.
///
/// A scanner is configured with at most one record separator and one field
/// separator, then driven one record at a time. The first failure (bad
/// separator pattern, I/O error, protocol violation) is latched and makes
/// every subsequent [`scan`](Scanner::scan) return `false`.
#[derive(Default)]
pub struct Scanner {
    lr: Option<Box<dyn LineReader>>,
    rows_rx: Option<bytes::Regex>,
    fields_rx: Option<Regex>,
    err: Option<Error>,

    rec_number: usize,
    file_rec_number: usize,
    // Reset owed to file_rec_number after a source boundary; applied before
    // the next read so the boundary-flushed record keeps its old count.
    file_reset: bool,
    rec: String,
    fields: Vec<String>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the scanner at a new input. The record counter restarts;
    /// per-file counting is handled by boundary detection during scanning.
    pub fn set_source(&mut self, src: Box<dyn Source>) {
        self.lr = Some(match &self.rows_rx {
            Some(rx) => Box::new(RxLineReader::new(src, rx.clone())),
            None => Box::new(SimpleLineReader::new(src)),
        });
        self.rec_number = 0;
    }

    /// Sets the regex that separates input into records. An empty pattern is
    /// a no-op. If a source is already installed the live reader is rewrapped
    /// so the new separator applies from the current position; bytes it had
    /// buffered are recovered through the reader chain.
    pub fn set_row_sep(&mut self, pattern: &str) {
        if self.err.is_some() || pattern.is_empty() {
            return;
        }
        let rx = match bytes::Regex::new(pattern) {
            Ok(rx) => rx,
            Err(e) => {
                self.err = Some(Error::RowSep(e));
                return;
            }
        };
        self.rows_rx = Some(rx.clone());
        if let Some(old) = self.lr.take() {
            self.lr = Some(Box::new(RxLineReader::new(old, rx)));
        }
    }

    /// Sets the regex that separates a record into fields.
    pub fn set_field_sep(&mut self, pattern: &str) {
        if self.err.is_some() {
            return;
        }
        match Regex::new(pattern) {
            Ok(rx) => self.fields_rx = Some(rx),
            Err(e) => self.err = Some(Error::FieldSep(e)),
        }
    }

    /// Advances to the next record, returning `false` at end of input or on
    /// a latched error. On success the record is split into fields and both
    /// counters advance.
    pub fn scan(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        loop {
            if self.file_reset {
                self.file_rec_number = 0;
                self.file_reset = false;
            }
            let read = match self.lr.as_mut() {
                Some(lr) => lr.read_line(),
                None => {
                    self.err = Some(Error::scan("nil reader"));
                    return false;
                }
            };
            let line = match read {
                Ok(line) => line,
                Err(e) => {
                    self.err = Some(e);
                    return false;
                }
            };
            match line {
                // A bare boundary: reset the per-file counter and go on to
                // the first record of the next source.
                Line::AtBoundary(rec) if rec.is_empty() => {
                    self.file_reset = true;
                }
                // A record cut off by the boundary still counts against the
                // source it came from; the reset applies afterwards.
                Line::AtBoundary(rec) => {
                    self.commit(&rec);
                    self.file_reset = true;
                    return true;
                }
                Line::Delimited(rec) | Line::AtEof(rec) => {
                    if rec.is_empty() {
                        return false;
                    }
                    self.commit(&rec);
                    return true;
                }
            }
        }
    }

    fn commit(&mut self, rec: &[u8]) {
        self.split_record(rec);
        self.rec_number += 1;
        self.file_rec_number += 1;
    }

    fn split_record(&mut self, rec: &[u8]) {
        self.rec = String::from_utf8_lossy(rec).into_owned();
        if let Some(rx) = &self.fields_rx {
            let mut fields: Vec<String> = rx.split(&self.rec).map(str::to_string).collect();
            // A separator matching at the record edge produces an empty
            // first or last field; strip those, keep interior empties.
            if fields.first().is_some_and(|f| f.is_empty()) {
                fields.remove(0);
            }
            if fields.last().is_some_and(|f| f.is_empty()) {
                fields.pop();
            }
            self.fields = fields;
        } else {
            self.fields = self
                .rec
                .split_ascii_whitespace()
                .map(str::to_string)
                .collect();
        }
    }

    /// The latched error, if any. End of input is not an error.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Returns the i-th field of the current record: 0 is the whole record,
    /// indexes past the last field are empty.
    pub fn field(&self, i: usize) -> &str {
        if self.err.is_some() {
            return "";
        }
        match i {
            0 => &self.rec,
            i if i <= self.fields.len() => &self.fields[i - 1],
            _ => "",
        }
    }

    /// Number of fields of the current record.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Records scanned since the source was installed.
    pub fn record_number(&self) -> usize {
        self.rec_number
    }

    /// Records scanned within the current source entry.
    pub fn file_record_number(&self) -> usize {
        self.file_rec_number
    }

    /// Name of the source the current record came from.
    pub fn filename(&self) -> &str {
        self.lr.as_deref().map(|lr| lr.name()).unwrap_or("")
    }
}
