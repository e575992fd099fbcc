//! Configuration for skipkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Highest `max_level` a store accepts.
///
/// With fair coin flips a height of 32 is expected once per 2^31 inserts,
/// so larger ceilings only grow the head tower.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Main configuration for a skipkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Skip List Configuration
    // -------------------------------------------------------------------------
    /// Ceiling on entry height. The head tower has `max_level + 1` links.
    pub max_level: usize,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// File used by `Store::export` / `Store::import`
    pub snapshot_path: PathBuf,

    /// Separator between key and value on each snapshot line
    pub delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: 16,
            snapshot_path: PathBuf::from("store/dumpFile"),
            delimiter: ':',
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can back a store
    pub fn validate(&self) -> Result<()> {
        if self.max_level > MAX_LEVEL_LIMIT {
            return Err(StoreError::Config(format!(
                "max_level {} exceeds limit {}",
                self.max_level, MAX_LEVEL_LIMIT
            )));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(StoreError::Config(
                "delimiter must not be a line terminator".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum entry height
    pub fn max_level(mut self, level: usize) -> Self {
        self.config.max_level = level;
        self
    }

    /// Set the snapshot file path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Set the key/value delimiter used in snapshots
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
