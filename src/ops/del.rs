//! Removal: COW path-copy delete with canonical collapsing.

use std::sync::Arc;

use crate::node::{self, BitmapNode, CollisionNode, Node, NodeRef, Slot};
use crate::splice;

/// Removes `key` from the subtree rooted at `node`, entered at `shift`.
///
/// Returns `node` itself (same `Arc`) when `key` is absent. The result is
/// always in canonical shape: a child left holding a single entry is pulled
/// up into its parent, and a parent left as a pure pass-through is replaced
/// by that entry, so no single-entry wrapper survives on the path.
#[must_use]
pub fn del<K, V>(key: &K, hash: i32, shift: u32, node: &NodeRef<K, V>) -> NodeRef<K, V>
where
    K: Clone + PartialEq,
    V: Clone,
{
    let updated = match &**node {
        Node::Empty => None,
        Node::Collision(collision) => del_from_collision(collision, key),
        Node::Bitmap(bitmap) => del_from_bitmap(bitmap, key, hash, shift),
    };
    updated.map_or_else(|| Arc::clone(node), Arc::new)
}

// ---------------------------------------------------------------------------
// Bitmap node remove
// ---------------------------------------------------------------------------

fn del_from_bitmap<K, V>(
    bitmap: &BitmapNode<K, V>,
    key: &K,
    hash: i32,
    shift: u32,
) -> Option<Node<K, V>>
where
    K: Clone + PartialEq,
    V: Clone,
{
    let bit = node::mask(node::fragment(hash, shift));
    let data_mask = bitmap.data_mask();
    let node_mask = bitmap.node_mask();

    if data_mask & bit != 0 {
        let pos = bitmap.entry_index(bit);
        if bitmap.entry(pos).0 != key {
            return None;
        }
        if bitmap.arity() == 1 {
            return Some(Node::Empty);
        }
        // A two-entry leaf becomes a single-entry node here; the parent
        // absorbs it on the way up.
        let slots = splice::remove_pair(bitmap.slots(), pos);
        return Some(Node::bitmap(data_mask ^ bit, node_mask, slots));
    }

    if node_mask & bit == 0 {
        return None;
    }

    let pos = bitmap.child_index(bit);
    let child = bitmap.child(pos);
    let new_child = del(key, hash, shift + node::BITS_PER_LEVEL, child);
    if Arc::ptr_eq(&new_child, child) {
        return None;
    }

    if new_child.is_empty() {
        if bitmap.arity() == 1 {
            return Some(Node::Empty);
        }
        let slots = splice::remove_pair(bitmap.slots(), pos);
        return Some(Node::bitmap(data_mask, node_mask ^ bit, slots));
    }

    if let Some((k, v)) = new_child.single_entry() {
        let entry = Slot::Entry(k.clone(), v.clone());

        if data_mask == 0 && bitmap.children_len() == 1 {
            // Pure pass-through: drop this level, readdressing the entry here.
            tracing::trace!(shift, "collapsing single-entry level");
            return Some(Node::bitmap(bit, 0, Box::new([entry])));
        }

        let entry_at = node::index(data_mask, bit);
        let slots = splice::splice_replace(bitmap.slots(), pos, 1, entry_at, &[entry]);
        return Some(Node::bitmap(data_mask | bit, node_mask ^ bit, slots));
    }

    let slots = splice::replace_at(bitmap.slots(), pos, Slot::Child(new_child));
    Some(Node::bitmap(data_mask, node_mask, slots))
}

// ---------------------------------------------------------------------------
// Collision node remove
// ---------------------------------------------------------------------------

fn del_from_collision<K, V>(collision: &CollisionNode<K, V>, key: &K) -> Option<Node<K, V>>
where
    K: Clone + PartialEq,
    V: Clone,
{
    let pos = collision.position(key)?;
    if collision.len() == 1 {
        return Some(Node::Empty);
    }
    Some(Node::collision(splice::remove_pair(collision.pairs(), pos)))
}
