//! Persistent map facade over a trie root.

use std::fmt;
use std::ops;
use std::sync::Arc;

use crate::error::Result;
use crate::hash::{GenericHasher, KeyHasher};
use crate::iter::Iter;
use crate::node::{self, NodeRef};
use crate::ops::del::del;
use crate::ops::get::{get, has};
use crate::ops::set::set;

/// Persistent hash map: a trie root paired with a hash function.
///
/// Every update returns a new map and leaves `self` untouched; the two share
/// all nodes off the updated path. Cloning is O(1). An update that changes
/// nothing returns a map with the very same root (see [`ptr_eq`](Self::ptr_eq)).
pub struct HamtMap<K, V, H = GenericHasher> {
    root: NodeRef<K, V>,
    hasher: Arc<H>,
}

// ---------------------------------------------------------------------------
// Construction & accessors, no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V> {
    /// Creates an empty map using [`GenericHasher`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(GenericHasher)
    }
}

impl<K, V, H> HamtMap<K, V, H> {
    /// Creates an empty map using a custom hash function.
    #[must_use]
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            root: node::empty(),
            hasher: Arc::new(hasher),
        }
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &NodeRef<K, V> {
        &self.root
    }

    /// Returns the hash function.
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Counts the entries. O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().len()
    }

    /// Returns `true` if both maps share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    fn with_root(&self, root: NodeRef<K, V>) -> Self {
        Self {
            root,
            hasher: Arc::clone(&self.hasher),
        }
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K: PartialEq, V, H: KeyHasher<K>> HamtMap<K, V, H> {
    /// Returns a reference to the value associated with `key`.
    ///
    /// # Errors
    ///
    /// Propagates the hasher's error for `key`.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        let hash = self.hasher.hash_key(key)?;
        Ok(get(key, hash, &self.root))
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Errors
    ///
    /// Propagates the hasher's error for `key`.
    pub fn has(&self, key: &K) -> Result<bool> {
        let hash = self.hasher.hash_key(key)?;
        Ok(has(key, hash, &self.root))
    }
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl<K: Clone + PartialEq, V: Clone + PartialEq, H: KeyHasher<K>> HamtMap<K, V, H> {
    /// Returns a map with `key` mapped to `value`.
    ///
    /// If `key` already maps to an equal value the returned map shares this
    /// map's root.
    ///
    /// # Errors
    ///
    /// Propagates the hasher's error, for `key` or for a stored key that
    /// has to be rehashed.
    pub fn set(&self, key: K, value: V) -> Result<Self> {
        let hash = self.hasher.hash_key(&key)?;
        let root = set(key, value, hash, &*self.hasher, 0, &self.root)?;
        Ok(self.with_root(root))
    }

    /// Returns a map with every pair of `entries` set, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first key the hasher rejects.
    pub fn set_all<I>(&self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .try_fold(self.clone(), |map, (key, value)| map.set(key, value))
    }
}

impl<K: Clone + PartialEq, V: Clone + PartialEq, H: KeyHasher<K> + Default> HamtMap<K, V, H> {
    /// Builds a map from `entries` with a default-constructed hasher.
    ///
    /// # Errors
    ///
    /// Stops at the first key the hasher rejects.
    pub fn try_from_iter<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::with_hasher(H::default()).set_all(entries)
    }
}

impl<K: Clone + PartialEq, V: Clone, H: KeyHasher<K>> HamtMap<K, V, H> {
    /// Returns a map without `key`.
    ///
    /// If `key` is absent the returned map shares this map's root.
    ///
    /// # Errors
    ///
    /// Propagates the hasher's error for `key`.
    pub fn del(&self, key: &K) -> Result<Self> {
        let hash = self.hasher.hash_key(key)?;
        let root = del(key, hash, 0, &self.root);
        Ok(self.with_root(root))
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, H> Clone for HamtMap<K, V, H> {
    fn clone(&self) -> Self {
        self.with_root(Arc::clone(&self.root))
    }
}

impl<K, V, H: Default> Default for HamtMap<K, V, H> {
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HamtMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both maps hold the same keys mapped to equal values.
impl<K: PartialEq, V: PartialEq, H: KeyHasher<K>> PartialEq for HamtMap<K, V, H> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| matches!(other.get(key), Ok(Some(v)) if v == value))
    }
}

impl<K: PartialEq, V, H: KeyHasher<K>> ops::Index<&K> for HamtMap<K, V, H> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).ok().flatten().expect("key not found")
    }
}

impl<'a, K, V, H> IntoIterator for &'a HamtMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
