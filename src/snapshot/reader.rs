//! Snapshot Reader
//!
//! Reads `key<delimiter>value` lines back from a snapshot source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Split a snapshot line at its first delimiter
///
/// Returns `None` for an empty line, a line without the delimiter, or a
/// line whose key or value part is empty. Everything after the first
/// delimiter, including further delimiters, is the value.
pub fn parse_line(line: &str, delimiter: char) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(delimiter)?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Reads records from a snapshot, skipping lines it cannot use
pub struct SnapshotReader<R> {
    /// Buffered line source
    reader: R,
    /// Key/value separator
    delimiter: char,
    /// Lines consumed so far (1-based after the first read)
    line_no: u64,
    /// Lines skipped as malformed
    skipped: u64,
    /// Scratch buffer reused for every line
    line: String,
}

impl SnapshotReader<BufReader<File>> {
    /// Open the snapshot file at `path`
    pub fn open(path: &Path, delimiter: char) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), delimiter))
    }
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R, delimiter: char) -> Self {
        Self {
            reader,
            delimiter,
            line_no: 0,
            skipped: 0,
            line: String::new(),
        }
    }

    /// Read the next usable record
    ///
    /// Blank lines, lines without the delimiter, lines with an empty key or
    /// value, and lines whose key or value fails to parse are skipped and
    /// counted. Returns `Ok(None)` at
    /// end of input; I/O failures are returned as errors.
    pub fn next_record<K: FromStr, V: FromStr>(&mut self) -> Result<Option<(K, V)>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let text = self.line.strip_suffix('\n').unwrap_or(&self.line);
            let text = text.strip_suffix('\r').unwrap_or(text);

            let parsed: Option<(K, V)> = parse_line(text, self.delimiter)
                .and_then(|(key, value)| Some((key.parse().ok()?, value.parse().ok()?)));

            match parsed {
                Some(record) => return Ok(Some(record)),
                None => {
                    tracing::trace!("Skipping malformed snapshot line {}", self.line_no);
                    self.skipped += 1;
                }
            }
        }
    }

    /// Number of lines skipped as malformed
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}
