//! Skip list engine
//!
//! Arena-backed skip list with a sentinel head tower.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;

use super::entry::{Entry, Link};
use super::iter::{Iter, LevelIter};
use super::level::LevelGenerator;
use super::{DeleteOutcome, InsertOutcome};

/// Ordered map from `K` to `V` organised as a skip list
///
/// ## Ownership
/// Entries are stored in `slots`, an arena owned by the list. Successor links
/// (in the head tower and in each entry) are slot indices and never own
/// anything. Vacated slots go on `free` and are reused by later inserts.
/// Dropping the list drops the arena and with it every entry.
///
/// ## Invariants (between operations)
/// - Level 0 is strictly increasing by key and reaches every entry
/// - An entry linked on level `i > 0` is linked on every level below `i`
/// - `head[top_level]` is non-empty whenever `top_level > 0`
pub struct SkipList<K, V, R = StdRng> {
    /// Sentinel tower: `head[i]` is the first entry on level `i`
    head: Vec<Link>,

    /// Entry arena; `None` marks a vacant slot
    slots: Vec<Option<Entry<K, V>>>,

    /// Vacant slot indices available for reuse
    free: Vec<usize>,

    /// Highest level holding at least one entry (0 when empty)
    top_level: usize,

    /// Number of live entries
    len: usize,

    /// Height policy for new entries
    levels: LevelGenerator<R>,
}

/// Outcome of a top-down descent for a key
///
/// `path[i]` is the last node visited on level `i` before the key's position
/// (`None` is the head). Levels above the current top are left at the head,
/// which is where a taller new entry has to be spliced in.
#[derive(Debug, Clone)]
pub(crate) struct Located {
    path: Vec<Link>,
    found: Link,
}

impl Located {
    /// Whether the key is already stored
    pub(crate) fn is_found(&self) -> bool {
        self.found.is_some()
    }
}

impl<K: Ord, V> SkipList<K, V, StdRng> {
    /// Create an empty list whose entries are at most `max_level` high
    ///
    /// `max_level` is clamped to [`MAX_LEVEL_LIMIT`](crate::config::MAX_LEVEL_LIMIT).
    pub fn new(max_level: usize) -> Self {
        Self::with_generator(LevelGenerator::new(max_level))
    }

    /// Create an empty list with a deterministic height sequence
    pub fn seeded(max_level: usize, seed: u64) -> Self {
        Self::with_generator(LevelGenerator::seeded(max_level, seed))
    }
}

impl<K: Ord, V, R: Rng> SkipList<K, V, R> {
    /// Create an empty list drawing heights from `levels`
    pub fn with_generator(levels: LevelGenerator<R>) -> Self {
        Self {
            head: vec![None; levels.max_level() + 1],
            slots: Vec::new(),
            free: Vec::new(),
            top_level: 0,
            len: 0,
            levels,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of entries, O(1)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ceiling on entry height fixed at construction
    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    /// Highest level currently holding an entry
    pub fn top_level(&self) -> usize {
        self.top_level
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Insert `key` with `value` if the key is absent
    ///
    /// An existing key keeps its stored value; this is not an upsert.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        let located = self.locate(&key);
        self.insert_located(located, key, value)
    }

    /// Look up the value stored for `key`
    pub fn search(&self, key: &K) -> Option<&V> {
        self.find(key).map(|slot| self.entry(slot).value())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key` and drop its entry
    pub fn delete(&mut self, key: &K) -> DeleteOutcome {
        let located = self.locate(key);
        self.delete_located(located)
    }

    /// Overwrite the value of an existing key, returning the old value
    ///
    /// Absent keys are left absent and `None` is returned.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        let slot = self.find(key)?;
        Some(self.entry_mut(slot).set_value(value))
    }

    /// Ascending traversal of all entries
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.head[0], self.len)
    }

    /// Traversal of the entries linked on `level`, in key order
    ///
    /// Levels above `max_level` are empty.
    pub fn level_iter(&self, level: usize) -> LevelIter<'_, K, V> {
        let first = self.head.get(level).copied().flatten();
        LevelIter::new(&self.slots, level, first)
    }

    /// Highest level the entry for `key` is linked on
    pub fn height_of(&self, key: &K) -> Option<usize> {
        self.find(key).map(|slot| self.entry(slot).level())
    }

    // =========================================================================
    // Two-phase internals
    // =========================================================================

    /// Descend from the top level towards `key`, recording predecessors
    pub(crate) fn locate(&self, key: &K) -> Located {
        let mut path = vec![None; self.head.len()];
        let mut current: Link = None;

        for level in (0..=self.top_level).rev() {
            current = self.advance(current, level, key);
            path[level] = current;
        }

        let found = self
            .next_of(current, 0)
            .filter(|&slot| self.entry(slot).key() == key);

        Located { path, found }
    }

    /// Splice a new entry at the position found by `locate(&key)`
    ///
    /// `located` must come from `locate` on the same key with no mutation
    /// in between.
    pub(crate) fn insert_located(&mut self, located: Located, key: K, value: V) -> InsertOutcome {
        if located.is_found() {
            return InsertOutcome::AlreadyExists;
        }

        let height = self.levels.random_level();
        if height > self.top_level {
            // path[top_level + 1..=height] already points at the head
            tracing::trace!(from = self.top_level, to = height, "raising top level");
            self.top_level = height;
        }

        let slot = self.allocate(Entry::new(key, value, height));
        for level in 0..=height {
            let pred = located.path[level];
            let succ = self.next_of(pred, level);
            self.entry_mut(slot).set_next(level, succ);
            self.set_next_of(pred, level, Some(slot));
        }

        self.len += 1;
        InsertOutcome::Inserted
    }

    /// Unlink and drop the entry found by `locate`
    pub(crate) fn delete_located(&mut self, located: Located) -> DeleteOutcome {
        let Some(target) = located.found else {
            return DeleteOutcome::NotFound;
        };

        for level in 0..=self.top_level {
            let pred = located.path[level];
            if self.next_of(pred, level) != Some(target) {
                // Target was never linked this high
                break;
            }
            let succ = self.entry(target).next(level);
            self.set_next_of(pred, level, succ);
        }

        while self.top_level > 0 && self.head[self.top_level].is_none() {
            self.top_level -= 1;
        }

        self.release(target);
        self.len -= 1;
        DeleteOutcome::Deleted
    }

    /// First entry on level 0
    pub(crate) fn first_slot(&self) -> Link {
        self.head[0]
    }

    /// First entry whose key is strictly greater than `key`
    pub(crate) fn first_after(&self, key: &K) -> Link {
        let mut current: Link = None;
        for level in (0..=self.top_level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.entry(next).key() > key {
                    break;
                }
                current = Some(next);
            }
        }
        self.next_of(current, 0)
    }

    /// Key and value of the entry in `slot`
    pub(crate) fn slot_entry(&self, slot: usize) -> Option<(&K, &V)> {
        let entry = self.slots.get(slot)?.as_ref()?;
        Some((entry.key(), entry.value()))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Slot of the entry holding `key`, without recording a path
    fn find(&self, key: &K) -> Link {
        let mut current: Link = None;
        for level in (0..=self.top_level).rev() {
            current = self.advance(current, level, key);
        }
        self.next_of(current, 0)
            .filter(|&slot| self.entry(slot).key() == key)
    }

    /// Walk `level` from `from` while the next key is below `key`
    fn advance(&self, from: Link, level: usize, key: &K) -> Link {
        let mut current = from;
        while let Some(next) = self.next_of(current, level) {
            if self.entry(next).key() >= key {
                break;
            }
            current = Some(next);
        }
        current
    }

    /// Successor of `at` on `level`; `None` as `at` is the head
    fn next_of(&self, at: Link, level: usize) -> Link {
        match at {
            None => self.head[level],
            Some(slot) => self.entry(slot).next(level),
        }
    }

    fn set_next_of(&mut self, at: Link, level: usize, link: Link) {
        match at {
            None => self.head[level] = link,
            Some(slot) => self.entry_mut(slot).set_next(level, link),
        }
    }

    fn entry(&self, slot: usize) -> &Entry<K, V> {
        self.slots[slot]
            .as_ref()
            .expect("skip list link points at a vacant slot")
    }

    fn entry_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        self.slots[slot]
            .as_mut()
            .expect("skip list link points at a vacant slot")
    }

    fn allocate(&mut self, entry: Entry<K, V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> Option<(K, V)> {
        let entry = self.slots[slot].take()?;
        self.free.push(slot);
        Some(entry.into_parts())
    }
}

impl<K, V, R> fmt::Display for SkipList<K, V, R>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
    R: Rng,
{
    /// One line per level, bottom up: `Level 0: 3:a;5:c;7:b;`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*****Skip List*****")?;
        for level in 0..=self.top_level {
            write!(f, "Level {}: ", level)?;
            for (key, value) in self.level_iter(level) {
                write!(f, "{}:{};", key, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, R> fmt::Debug for SkipList<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len)
            .field("top_level", &self.top_level)
            .field("max_level", &(self.head.len() - 1))
            .finish()
    }
}
