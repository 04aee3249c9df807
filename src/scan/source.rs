use std::collections::VecDeque;
use std::io::Read;

use crate::error::Result;

/// Outcome of a single [`Source::read`] call.
///
/// End-of-input and the seam between two concatenated sources are distinct
/// states of the stream, not failures, so they travel in the `Ok` arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    /// `n` bytes were written to the front of the buffer.
    Data(usize),
    /// The entry at the cursor is exhausted and further entries remain.
    /// Returned exactly once per boundary; the next read serves the next
    /// entry.
    SourceEnd,
    /// The whole stream is exhausted.
    Eof,
}

/// A named, forward-only byte stream.
///
/// The name is opaque to the scanner; by convention it is a file path, or
/// "-" for standard input. The scanner never closes a source.
pub trait Source {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadResult>;

    /// Logical name of the stream the next bytes will come from.
    fn name(&self) -> &str;
}

/// Adapts any [`Read`] into a [`Source`] with an attached name.
pub struct NamedReader<R> {
    name: String,
    inner: R,
}

impl<R: Read> NamedReader<R> {
    pub fn new(name: impl Into<String>, inner: R) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<R: Read> Source for NamedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadResult> {
        match self.inner.read(buf)? {
            0 => Ok(ReadResult::Eof),
            n => Ok(ReadResult::Data(n)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Logical concatenation of several sources into one.
///
/// When an entry runs out and others remain, the read that observed the
/// entry's EOF reports [`ReadResult::SourceEnd`] so the caller can reset
/// per-file state; only the last entry's EOF surfaces as `Eof`.
pub struct MultiSource {
    sources: VecDeque<Box<dyn Source>>,
}

impl MultiSource {
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            sources: sources.into(),
        }
    }
}

impl Source for MultiSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadResult> {
        loop {
            let Some(cur) = self.sources.front_mut() else {
                return Ok(ReadResult::Eof);
            };
            match cur.read(buf)? {
                ReadResult::Data(n) if n > 0 => return Ok(ReadResult::Data(n)),
                // A zero-length read is not progress; try again.
                ReadResult::Data(_) => continue,
                // A boundary inside a nested concatenation: the entry is not
                // exhausted, so pass the seam through untouched.
                ReadResult::SourceEnd => return Ok(ReadResult::SourceEnd),
                ReadResult::Eof => {
                    self.sources.pop_front();
                    if !self.sources.is_empty() {
                        return Ok(ReadResult::SourceEnd);
                    }
                    return Ok(ReadResult::Eof);
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.sources.front().map(|s| s.name()).unwrap_or("")
    }
}
