//! Snapshot Writer
//!
//! Writes `key<delimiter>value` lines to a snapshot destination.

use std::fmt::{Display, Write as _};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, StoreError};

/// Writes snapshot records, in the order they are added
pub struct SnapshotWriter<W: Write> {
    /// Buffered writer for performance
    writer: BufWriter<W>,
    /// Key/value separator
    delimiter: char,
    /// Number of records written
    records: usize,
    /// Scratch buffer reused for every line
    line: String,
}

impl SnapshotWriter<File> {
    /// Create (or truncate) the snapshot file at `path`
    ///
    /// Missing parent directories are created.
    pub fn create(path: &Path, delimiter: char) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self::new(file, delimiter))
    }
}

impl<W: Write> SnapshotWriter<W> {
    /// Wrap an already-open destination
    pub fn new(inner: W, delimiter: char) -> Self {
        Self {
            writer: BufWriter::new(inner),
            delimiter,
            records: 0,
            line: String::new(),
        }
    }

    /// Append one record
    ///
    /// Fails with `InvalidRecord` if either side renders empty, the key
    /// contains the delimiter, or either side contains a line break.
    pub fn add(&mut self, key: &impl Display, value: &impl Display) -> Result<()> {
        self.line.clear();
        // Writing into a String cannot fail
        let _ = write!(self.line, "{}", key);
        let key_len = self.line.len();
        let _ = write!(self.line, "{}{}", self.delimiter, value);

        let (key_text, rest) = self.line.split_at(key_len);
        if key_text.is_empty() || rest.len() == self.delimiter.len_utf8() {
            return Err(StoreError::InvalidRecord(format!(
                "record for key {:?} has an empty key or value",
                key_text
            )));
        }
        if key_text.contains(self.delimiter) {
            return Err(StoreError::InvalidRecord(format!(
                "key {:?} contains the delimiter {:?}",
                key_text, self.delimiter
            )));
        }
        if key_text.contains(&['\n', '\r'][..]) || rest.contains(&['\n', '\r'][..]) {
            return Err(StoreError::InvalidRecord(format!(
                "record for key {:?} contains a line break",
                key_text
            )));
        }

        self.line.push('\n');
        self.writer.write_all(self.line.as_bytes())?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush everything and release the destination
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        let _inner = self.writer.into_inner().map_err(|e| e.into_error())?;
        Ok(self.records)
    }
}
