//! Skip list iterators
//!
//! Lazy, forward-only walks over one level chain. Each call to
//! `SkipList::iter` starts a fresh walk from the head.

use super::entry::{Entry, Link};

/// Ascending iterator over all entries (level 0)
pub struct Iter<'a, K, V> {
    inner: LevelIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Option<Entry<K, V>>], first: Link, len: usize) -> Self {
        Self {
            inner: LevelIter::new(slots, 0, first),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the entries linked on a single level
pub struct LevelIter<'a, K, V> {
    slots: &'a [Option<Entry<K, V>>],
    level: usize,
    next: Link,
}

impl<'a, K, V> LevelIter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Option<Entry<K, V>>], level: usize, first: Link) -> Self {
        Self { slots, level, next: first }
    }
}

impl<'a, K, V> Iterator for LevelIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        let entry = self.slots.get(slot)?.as_ref()?;
        self.next = entry.next(self.level);
        Some((entry.key(), entry.value()))
    }
}
