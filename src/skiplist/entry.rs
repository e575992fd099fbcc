//! Skip list entry
//!
//! A key, a value and one successor link per level the entry occupies.

/// Successor link: the arena slot of the next entry, or `None` at the end of
/// a level chain.
pub type Link = Option<usize>;

/// A single key-value entry of the skip list
#[derive(Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    /// `forward[i]` is the successor on level `i`; length is `level + 1`
    forward: Vec<Link>,
}

impl<K, V> Entry<K, V> {
    /// Create an entry spanning levels `0..=level`, with no successors yet
    pub fn new(key: K, value: V, level: usize) -> Self {
        Self {
            key,
            value,
            forward: vec![None; level + 1],
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replace the stored value in place, returning the previous one
    pub fn set_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Highest level this entry is linked on
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }

    /// Successor on `level`
    ///
    /// Levels above `self.level()` have no successor.
    pub fn next(&self, level: usize) -> Link {
        self.forward.get(level).copied().flatten()
    }

    /// Point this entry's `level` link at `link`
    ///
    /// # Panics
    /// If `level > self.level()`.
    pub fn set_next(&mut self, level: usize, link: Link) {
        self.forward[level] = link;
    }

    pub(crate) fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
