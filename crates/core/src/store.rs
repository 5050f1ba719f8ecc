//! Flat store: canonical key -> scalar value
//!
//! ## Ordering invariant
//!
//! Iteration is strictly lexicographic by canonical key, compared byte-wise.
//! The tree exporter depends on this: entries that share a key prefix must be
//! contiguous so a single forward pass can rebuild the nesting. The ordering is
//! owned by this type (a `BTreeMap<String, _>`, whose `str` ordering is
//! byte-wise) and no API exposes any other iteration order.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::key::{KeyPath, SEPARATOR};
use crate::value::Value;

/// Sorted mapping from canonical key to [`Value`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatStore {
    entries: BTreeMap<String, Value>,
}

impl FlatStore {
    /// Create an empty store
    pub fn new() -> Self {
        FlatStore::default()
    }

    /// Insert or overwrite the value at `path`
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, path: &KeyPath, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(path.canonical(), value.into())
    }

    /// Get the value at `path`
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        self.entries.get(&path.canonical())
    }

    /// Remove the value at `path`, returning it
    pub fn remove(&mut self, path: &KeyPath) -> Option<Value> {
        self.entries.remove(&path.canonical())
    }

    /// Whether a value exists at `path`
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.entries.contains_key(&path.canonical())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in lexicographic canonical-key order
    ///
    /// The iterator is lazy and finite; call again to restart.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    /// Canonical keys in lexicographic order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether some other key lies below `canonical` in the key hierarchy
    ///
    /// All keys starting with `canonical` followed by the separator form one
    /// contiguous range, so only the first key of that range is inspected.
    pub fn has_descendants(&self, canonical: &str) -> bool {
        let mut prefix = String::with_capacity(canonical.len() + 1);
        prefix.push_str(canonical);
        prefix.push(SEPARATOR);

        self.entries
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    /// The key that cannot be exported alongside `path`, if any
    ///
    /// Returns an existing ancestor of `path` that holds a value, or `path`
    /// itself if keys exist below it. In a nested document either one would
    /// have to be both a leaf and an object.
    pub fn shadowed_by(&self, path: &KeyPath) -> Option<String> {
        let canonical = path.canonical();
        if self.has_descendants(&canonical) {
            return Some(canonical);
        }

        let mut ancestor = String::new();
        for segment in &path.segments()[..path.depth() - 1] {
            if !ancestor.is_empty() {
                ancestor.push(SEPARATOR);
            }
            ancestor.push_str(segment);
            if self.entries.contains_key(&ancestor) {
                return Some(ancestor);
            }
        }
        None
    }
}

/// Ordered iterator over `(canonical key, value)` pairs
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: btree_map::Iter<'a, String, Value>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a> IntoIterator for &'a FlatStore {
    type Item = (&'a str, &'a Value);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl FromIterator<(KeyPath, Value)> for FlatStore {
    fn from_iter<T: IntoIterator<Item = (KeyPath, Value)>>(iter: T) -> Self {
        let mut store = FlatStore::new();
        store.extend(iter);
        store
    }
}

impl Extend<(KeyPath, Value)> for FlatStore {
    fn extend<T: IntoIterator<Item = (KeyPath, Value)>>(&mut self, iter: T) {
        for (path, value) in iter {
            self.insert(&path, value);
        }
    }
}
