//! Store Module
//!
//! Thread-safe front of the skip list.
//!
//! ## Responsibilities
//! - Serialize mutations (insert/delete/replace)
//! - Serve lookups and enumeration alongside writers
//! - Export and import text snapshots

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::Result;
use crate::skiplist::{DeleteOutcome, InsertOutcome, SkipList};
use crate::snapshot::{self, ImportStats};

/// A concurrent ordered key-value store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (insert/delete/replace): Serialized by `write_lock`
///   - Only ONE mutation at a time, in lock acquisition order
///   - The descent runs under a shared guard on `list`, so readers keep
///     going while a writer searches for its position
///   - Only the splice/unlink takes the exclusive guard on `list`
///
/// - **Reads** (search/size/enumerate): Never touch `write_lock`
///   - Brief recursive shared guards on `list`; a reader sees the structure
///     either before or after a splice, never half way through
///   - A thread already holding a shared guard is not queued behind a
///     waiting writer, so nested reads cannot deadlock
///
/// The lock belongs to this instance, so unrelated stores never contend.
pub struct Store<K, V> {
    /// Store configuration
    config: Config,

    /// The skip list (internal RwLock)
    list: RwLock<SkipList<K, V>>,

    /// Serializes mutations
    write_lock: Mutex<()>,
}

impl<K: Ord, V> Store<K, V> {
    /// Create an empty store with the given config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let list = SkipList::new(config.max_level);
        Self::from_list(config, list)
    }

    /// Create an empty store with default config and the given ceiling
    pub fn with_max_level(max_level: usize) -> Result<Self> {
        Self::new(Config::builder().max_level(max_level).build())
    }

    /// Wrap an existing list (e.g. a seeded one)
    ///
    /// `config.max_level` is replaced by the list's own ceiling; the rest of
    /// the config is validated as in [`Store::new`].
    pub fn from_list(mut config: Config, list: SkipList<K, V>) -> Result<Self> {
        config.max_level = list.max_level();
        config.validate()?;
        Ok(Self {
            config,
            list: RwLock::new(list),
            write_lock: Mutex::new(()),
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a key-value pair if the key is absent
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Descend under a shared guard, recording predecessors
    /// 3. Splice under the exclusive guard
    pub fn insert(&self, key: K, value: V) -> InsertOutcome {
        let _write_guard = self.write_lock.lock();

        let located = self.list.read().locate(&key);
        if located.is_found() {
            tracing::debug!("insert rejected: key exists");
            return InsertOutcome::AlreadyExists;
        }

        let outcome = self.list.write().insert_located(located, key, value);
        tracing::debug!("inserted new entry");
        outcome
    }

    /// Delete a key
    pub fn delete(&self, key: &K) -> DeleteOutcome {
        let _write_guard = self.write_lock.lock();

        let located = self.list.read().locate(key);
        if !located.is_found() {
            return DeleteOutcome::NotFound;
        }

        let outcome = self.list.write().delete_located(located);
        tracing::debug!("deleted entry");
        outcome
    }

    /// Overwrite the value of an existing key, returning the old one
    pub fn replace(&self, key: &K, value: V) -> Option<V> {
        let _write_guard = self.write_lock.lock();
        self.list.write().replace(key, value)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get a copy of the value stored for `key`
    pub fn search(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.list.read_recursive().search(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.list.read_recursive().contains_key(key)
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.list.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Lazy ascending enumeration of cloned key-value pairs
    ///
    /// No guard is held between steps. Each step takes a brief shared guard
    /// and resumes at the first key above the last one yielded, so the store
    /// may be mutated while enumerating, including from the loop body.
    pub fn enumerate(&self) -> Enumerate<'_, K, V> {
        Enumerate {
            store: self,
            last: None,
            done: false,
        }
    }

    /// Run `f` against the list under a shared guard
    ///
    /// `f` may read this store again but must not mutate it: a mutation
    /// waits for the guard `f` runs under.
    pub fn with_list<T>(&self, f: impl FnOnce(&SkipList<K, V>) -> T) -> T {
        f(&self.list.read_recursive())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Write all entries to the configured snapshot file
    pub fn export(&self) -> Result<usize>
    where
        K: Clone + fmt::Display,
        V: Clone + fmt::Display,
    {
        self.export_to(&self.config.snapshot_path)
    }

    /// Write all entries to `path`, truncating it first
    pub fn export_to(&self, path: &Path) -> Result<usize>
    where
        K: Clone + fmt::Display,
        V: Clone + fmt::Display,
    {
        snapshot::export(self, path)
    }

    /// Load entries from the configured snapshot file
    pub fn import(&self) -> Result<ImportStats>
    where
        K: FromStr,
        V: FromStr,
    {
        self.import_from(&self.config.snapshot_path)
    }

    /// Load entries from `path`; existing keys win over snapshot lines
    pub fn import_from(&self, path: &Path) -> Result<ImportStats>
    where
        K: FromStr,
        V: FromStr,
    {
        snapshot::import(self, path)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot delimiter from the configuration
    pub fn delimiter(&self) -> char {
        self.config.delimiter
    }
}

impl<K, V> fmt::Display for Store<K, V>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.list.read_recursive(), f)
    }
}

/// Ascending enumeration over a `Store`
///
/// Created by [`Store::enumerate`]. Each step sees the store as it is when
/// that step runs: keys inserted ahead of the cursor show up, keys deleted
/// ahead of it do not.
pub struct Enumerate<'a, K, V> {
    store: &'a Store<K, V>,
    /// Last key yielded; `None` before the first step
    last: Option<K>,
    done: bool,
}

impl<K: Ord + Clone, V: Clone> Iterator for Enumerate<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = {
            let list = self.store.list.read_recursive();
            let slot = match &self.last {
                None => list.first_slot(),
                Some(last) => list.first_after(last),
            };
            slot.and_then(|slot| list.slot_entry(slot))
                .map(|(key, value)| (key.clone(), value.clone()))
        };

        match item {
            Some((key, value)) => {
                self.last = Some(key.clone());
                Some((key, value))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}
