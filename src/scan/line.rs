use regex::bytes::Regex;

use crate::error::{Error, Result};
use crate::scan::source::{ReadResult, Source};

/// Scratch-buffer size for both line readers.
const BUF_SIZE: usize = 4096;

/// One record handed back by a line reader, tagged with how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Terminated by the record separator; the stream continues.
    Delimited(Vec<u8>),
    /// Cut short by the seam between two sources. The separator was not
    /// consumed; the next record belongs to the next source.
    AtBoundary(Vec<u8>),
    /// The tail of the stream. Empty when the input ended on a separator.
    AtEof(Vec<u8>),
}

/// A source that can additionally hand out one record at a time.
///
/// Being a [`Source`] itself is what lets the scanner rewrap a live reader
/// inside an [`RxLineReader`] when the record separator changes mid-stream:
/// bytes the old reader had buffered are recovered through its `read`.
pub trait LineReader: Source {
    fn read_line(&mut self) -> Result<Line>;
}

/// Splits a source into LF-terminated records.
///
/// Used for the default record-separator case; keeps its own read buffer so
/// the underlying source is hit in large chunks.
pub struct SimpleLineReader {
    src: Box<dyn Source>,
    name: String,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    // Name refresh owed after a boundary flush; applied on the next
    // read_line so the flushed record still reports the old source.
    refresh_name: bool,
}

impl SimpleLineReader {
    pub fn new(src: Box<dyn Source>) -> Self {
        let name = src.name().to_string();
        Self {
            src,
            name,
            buf: vec![0; BUF_SIZE],
            start: 0,
            end: 0,
            refresh_name: false,
        }
    }
}

impl Source for SimpleLineReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadResult> {
        if self.start < self.end {
            let n = buf.len().min(self.end - self.start);
            buf[..n].copy_from_slice(&self.buf[self.start..self.start + n]);
            self.start += n;
            return Ok(ReadResult::Data(n));
        }
        let res = self.src.read(buf)?;
        if res == ReadResult::SourceEnd {
            self.name = self.src.name().to_string();
        }
        Ok(res)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl LineReader for SimpleLineReader {
    fn read_line(&mut self) -> Result<Line> {
        if self.refresh_name {
            self.name = self.src.name().to_string();
            self.refresh_name = false;
        }
        let mut line = Vec::new();
        loop {
            let window = &self.buf[self.start..self.end];
            if let Some(i) = window.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&window[..i]);
                self.start += i + 1;
                return Ok(Line::Delimited(line));
            }
            line.extend_from_slice(window);
            self.start = 0;
            self.end = 0;
            match self.src.read(&mut self.buf)? {
                ReadResult::Data(0) => return Err(Error::scan("empty read")),
                ReadResult::Data(n) => self.end = n,
                ReadResult::Eof => return Ok(Line::AtEof(line)),
                ReadResult::SourceEnd => {
                    self.refresh_name = true;
                    return Ok(Line::AtBoundary(line));
                }
            }
        }
    }
}

/// Separator state of an [`RxLineReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SepState {
    Open,
    SourceEnd,
    Finished,
}

/// Splits a source into records delimited by an arbitrary regex.
///
/// The separator may be longer than one read, so a record is committed only
/// once a byte beyond the match has been seen or the stream has ended: a
/// match that touches the end of the accumulator could still grow.
pub struct RxLineReader {
    src: Box<dyn Source>,
    rx: Regex,
    name: String,
    buf: Vec<u8>,
    // Bytes read but not yet consumed (the remainder after a match). Drained
    // by `read` before the underlying source is touched again.
    pending: Vec<u8>,
    stat: SepState,
}

impl RxLineReader {
    pub fn new(src: Box<dyn Source>, rx: Regex) -> Self {
        Self::with_buf_size(src, rx, BUF_SIZE)
    }

    fn with_buf_size(src: Box<dyn Source>, rx: Regex, size: usize) -> Self {
        let name = src.name().to_string();
        Self {
            src,
            rx,
            name,
            buf: vec![0; size],
            pending: Vec::new(),
            stat: SepState::Open,
        }
    }

    /// One underlying read into the scratch buffer. End-of-input and source
    /// boundaries are folded into `stat`; once the state has left `Open` no
    /// further reads are issued.
    fn load_buf(&mut self) -> Result<()> {
        if self.stat != SepState::Open {
            return Ok(());
        }
        match self.src.read(&mut self.buf)? {
            ReadResult::Data(0) => Err(Error::scan("empty read")),
            ReadResult::Data(n) => {
                self.pending.extend_from_slice(&self.buf[..n]);
                Ok(())
            }
            ReadResult::Eof => {
                self.stat = SepState::Finished;
                Ok(())
            }
            ReadResult::SourceEnd => {
                self.name = self.src.name().to_string();
                self.stat = SepState::SourceEnd;
                Ok(())
            }
        }
    }
}

impl Source for RxLineReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadResult> {
        if !self.pending.is_empty() {
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            return Ok(ReadResult::Data(n));
        }
        self.src.read(buf)
    }

    fn name(&self) -> &str {
        // Carried-over bytes belong to the source read before the boundary.
        if !self.pending.is_empty() {
            &self.name
        } else {
            self.src.name()
        }
    }
}

impl LineReader for RxLineReader {
    fn read_line(&mut self) -> Result<Line> {
        let mut line: Vec<u8> = Vec::new();
        // Start of a match that ended flush with the accumulator, kept so
        // the separator can be stripped if the stream ends right after it.
        let mut found: Option<usize> = None;
        loop {
            if self.pending.is_empty() {
                self.load_buf()?;
                if self.pending.is_empty() && self.stat != SepState::Open {
                    if let Some(start) = found {
                        line.truncate(start);
                    }
                    if self.stat == SepState::Finished {
                        return Ok(Line::AtEof(line));
                    }
                    // The boundary itself closes the record; no separator
                    // is consumed and scanning resumes in the next entry.
                    self.stat = SepState::Open;
                    return Ok(Line::AtBoundary(line));
                }
            }
            line.extend_from_slice(&self.pending);
            self.pending.clear();
            match self.rx.find(&line).map(|m| (m.start(), m.end())) {
                Some((start, end)) if end < line.len() => {
                    self.pending.extend_from_slice(&line[end..]);
                    line.truncate(start);
                    return Ok(Line::Delimited(line));
                }
                Some((start, _)) => {
                    // Touches the end of the accumulator; more bytes could
                    // extend the match, so read on before committing.
                    found = Some(start);
                }
                None => found = None,
            }
        }
    }
}
