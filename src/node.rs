//! HAMT node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Width of a hash. A node entered at `shift >= HASH_BITS` is a collision node.
pub const HASH_BITS: u32 = 32;

/// Mask selecting one 5-bit hash fragment.
const FRAGMENT_MASK: u32 = (1 << BITS_PER_LEVEL) - 1;

/// Shared handle to an immutable node.
///
/// Identity (`Arc::ptr_eq`) is how `set` and `del` report a no-op.
pub type NodeRef<K, V> = Arc<Node<K, V>>;

/// HAMT node.
///
/// Nodes are never mutated once built; every update path-copies from the
/// changed leaf up to a new root and shares everything else.
pub enum Node<K, V> {
    /// No entries.
    Empty,
    /// Bitmap-indexed node.
    Bitmap(BitmapNode<K, V>),
    /// Flat list of pairs whose hashes are fully consumed.
    Collision(CollisionNode<K, V>),
}

/// A cell of a [`BitmapNode`].
#[derive(Clone)]
pub enum Slot<K, V> {
    /// Inline key-value pair.
    Entry(K, V),
    /// Nested node handling the next hash fragment.
    Child(NodeRef<K, V>),
}

/// Bitmap-indexed node.
///
/// Invariants:
/// - `data_mask & node_mask == 0`
/// - `data_mask | node_mask != 0`
/// - `slots` holds one [`Slot::Entry`] per `data_mask` bit in increasing bit
///   order, followed by one [`Slot::Child`] per `node_mask` bit in
///   **decreasing** bit order.
pub struct BitmapNode<K, V> {
    data_mask: u32,
    node_mask: u32,
    slots: Box<[Slot<K, V>]>,
}

/// Collision node: pairs compared by key equality only.
///
/// Invariant: never empty. Pair order is unspecified.
pub struct CollisionNode<K, V> {
    pairs: Box<[(K, V)]>,
}

/// Returns a fresh empty root.
#[must_use]
pub fn empty<K, V>() -> NodeRef<K, V> {
    Arc::new(Node::Empty)
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
///
/// The hash is shifted logically; shifts of 32 or more yield fragment 0.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn fragment(hash: i32, shift: u32) -> u32 {
    match (hash as u32).checked_shr(shift) {
        Some(bits) => bits & FRAGMENT_MASK,
        None => 0,
    }
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    pub(crate) fn bitmap(data_mask: u32, node_mask: u32, slots: Box<[Slot<K, V>]>) -> Self {
        debug_assert_eq!(data_mask & node_mask, 0, "slot is both entry and child");
        debug_assert_ne!(data_mask | node_mask, 0, "empty bitmap node");
        debug_assert_eq!(
            (data_mask.count_ones() + node_mask.count_ones()) as usize,
            slots.len(),
            "slot count does not match bitmaps"
        );
        Self::Bitmap(BitmapNode {
            data_mask,
            node_mask,
            slots,
        })
    }

    pub(crate) fn collision(pairs: Box<[(K, V)]>) -> Self {
        debug_assert!(!pairs.is_empty(), "empty collision node");
        Self::Collision(CollisionNode { pairs })
    }

    /// Returns `true` for [`Node::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the only pair of a node holding exactly one entry and no
    /// children. Such a node is absorbed by its parent after a delete.
    #[must_use]
    pub fn single_entry(&self) -> Option<(&K, &V)> {
        match self {
            Self::Bitmap(bitmap) if bitmap.node_mask == 0 && bitmap.data_mask.is_power_of_two() => {
                Some(bitmap.entry(0))
            }
            Self::Collision(collision) if collision.pairs.len() == 1 => {
                let (key, value) = &collision.pairs[0];
                Some((key, value))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl<K, V> BitmapNode<K, V> {
    /// Bitmap of positions occupied by inline entries.
    #[must_use]
    pub const fn data_mask(&self) -> u32 {
        self.data_mask
    }

    /// Bitmap of positions occupied by child nodes.
    #[must_use]
    pub const fn node_mask(&self) -> u32 {
        self.node_mask
    }

    /// All slots: entries first, then children in decreasing bit order.
    #[must_use]
    pub fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    /// Number of inline entries.
    #[must_use]
    pub const fn data_len(&self) -> usize {
        self.data_mask.count_ones() as usize
    }

    /// Number of child nodes.
    #[must_use]
    pub const fn children_len(&self) -> usize {
        self.node_mask.count_ones() as usize
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Slot index of the entry for `bit`.
    #[must_use]
    pub const fn entry_index(&self, bit: u32) -> usize {
        index(self.data_mask, bit)
    }

    /// Slot index of the child for `bit`.
    #[must_use]
    pub fn child_index(&self, bit: u32) -> usize {
        self.slots.len() - 1 - index(self.node_mask, bit)
    }

    /// Returns the entry stored in slot `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not an entry slot.
    #[must_use]
    pub fn entry(&self, pos: usize) -> (&K, &V) {
        match &self.slots[pos] {
            Slot::Entry(key, value) => (key, value),
            Slot::Child(_) => panic!("slot {pos} holds a child"),
        }
    }

    /// Returns the child stored in slot `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a child slot.
    #[must_use]
    pub fn child(&self, pos: usize) -> &NodeRef<K, V> {
        match &self.slots[pos] {
            Slot::Child(child) => child,
            Slot::Entry(..) => panic!("slot {pos} holds an entry"),
        }
    }

    /// Iterates over the inline entries in increasing bit order.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots[..self.data_len()].iter().filter_map(|slot| match slot {
            Slot::Entry(key, value) => Some((key, value)),
            Slot::Child(_) => None,
        })
    }

    /// Iterates over the children in decreasing bit order.
    pub fn children(&self) -> impl Iterator<Item = &NodeRef<K, V>> {
        self.slots[self.data_len()..].iter().filter_map(|slot| match slot {
            Slot::Child(child) => Some(child),
            Slot::Entry(..) => None,
        })
    }
}

impl<K, V> CollisionNode<K, V> {
    /// The colliding pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(K, V)] {
        &self.pairs
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the node holds no pairs. Never the case for a node
    /// reachable from a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: PartialEq, V> CollisionNode<K, V> {
    /// Position of `key` among the pairs.
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }

    /// Linear lookup by key equality.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

// ---------------------------------------------------------------------------
// Structural equality
// ---------------------------------------------------------------------------

impl<K: PartialEq, V: PartialEq> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Bitmap(a), Self::Bitmap(b)) => {
                a.data_mask == b.data_mask && a.node_mask == b.node_mask && a.slots == b.slots
            }
            (Self::Collision(a), Self::Collision(b)) => a.pairs == b.pairs,
            _ => false,
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Slot<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Entry(k1, v1), Self::Entry(k2, v2)) => k1 == k2 && v1 == v2,
            (Self::Child(a), Self::Child(b)) => Arc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Debug
// ---------------------------------------------------------------------------

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bitmap(bitmap) => f
                .debug_struct("Bitmap")
                .field("data_mask", &format_args!("{:#b}", bitmap.data_mask))
                .field("node_mask", &format_args!("{:#b}", bitmap.node_mask))
                .field("slots", &bitmap.slots)
                .finish(),
            Self::Collision(collision) => f
                .debug_struct("Collision")
                .field("pairs", &collision.pairs)
                .finish(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Slot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(key, value) => f.debug_tuple("Entry").field(key).field(value).finish(),
            Self::Child(child) => fmt::Debug::fmt(&**child, f),
        }
    }
}
