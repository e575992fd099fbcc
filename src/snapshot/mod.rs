//! Snapshot Module
//!
//! Plain-text dump and restore of a store.
//!
//! ## Responsibilities
//! - Write every entry in ascending key order, one per line
//! - Rebuild a store by feeding each line back through `insert`
//! - Skip blank and malformed lines without failing the load
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────┐
//! │ key1:value1\n            │
//! │ key2:value2\n            │
//! │ key3:value:with:colons\n │
//! └──────────────────────────┘
//! ```
//! Only the first delimiter on a line separates key from value. The file is
//! always rewritten in full; there is no header, checksum or versioning, and
//! an interrupted export leaves a truncated file behind.

mod reader;
mod writer;

pub use reader::{parse_line, SnapshotReader};
pub use writer::SnapshotWriter;

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::skiplist::InsertOutcome;
use crate::store::Store;

/// Result of an import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Lines that produced a new entry
    pub inserted: u64,

    /// Well-formed lines whose key was already present
    pub duplicates: u64,

    /// Blank lines, lines without a delimiter, and lines that failed to parse
    pub malformed: u64,
}

/// Export `store` to `path`, truncating any existing file
///
/// Returns the number of records written.
pub fn export<K, V>(store: &Store<K, V>, path: &Path) -> Result<usize>
where
    K: Ord + Clone + Display,
    V: Clone + Display,
{
    let writer = SnapshotWriter::create(path, store.delimiter())?;
    let written = write_entries(store, writer)?;
    tracing::info!("Exported {} entries to {}", written, path.display());
    Ok(written)
}

/// Export `store` to an arbitrary sink
pub fn export_to_writer<K, V, W>(store: &Store<K, V>, sink: W) -> Result<usize>
where
    K: Ord + Clone + Display,
    V: Clone + Display,
    W: Write,
{
    write_entries(store, SnapshotWriter::new(sink, store.delimiter()))
}

/// Import the snapshot at `path` into `store`
///
/// A missing or unreadable file is an error; malformed lines are not.
pub fn import<K, V>(store: &Store<K, V>, path: &Path) -> Result<ImportStats>
where
    K: Ord + FromStr,
    V: FromStr,
{
    let reader = SnapshotReader::open(path, store.delimiter())?;
    let stats = load_entries(store, reader)?;
    tracing::info!(
        "Imported {} entries from {} ({} duplicates, {} malformed lines)",
        stats.inserted,
        path.display(),
        stats.duplicates,
        stats.malformed
    );
    Ok(stats)
}

/// Import from an arbitrary buffered source
pub fn import_from_reader<K, V, R>(store: &Store<K, V>, source: R) -> Result<ImportStats>
where
    K: Ord + FromStr,
    V: FromStr,
    R: BufRead,
{
    load_entries(store, SnapshotReader::new(source, store.delimiter()))
}

fn write_entries<K, V, W>(store: &Store<K, V>, mut writer: SnapshotWriter<W>) -> Result<usize>
where
    K: Ord + Clone + Display,
    V: Clone + Display,
    W: Write,
{
    for (key, value) in store.enumerate() {
        writer.add(&key, &value)?;
    }
    writer.finish()
}

fn load_entries<K, V, R>(store: &Store<K, V>, mut reader: SnapshotReader<R>) -> Result<ImportStats>
where
    K: Ord + FromStr,
    V: FromStr,
    R: BufRead,
{
    let mut stats = ImportStats::default();
    while let Some((key, value)) = reader.next_record::<K, V>()? {
        match store.insert(key, value) {
            InsertOutcome::Inserted => stats.inserted += 1,
            InsertOutcome::AlreadyExists => stats.duplicates += 1,
        }
    }
    stats.malformed = reader.skipped();
    Ok(stats)
}
