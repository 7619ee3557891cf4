//! Insertion: COW path-copy insert with identity-preserving no-ops.

use std::sync::Arc;

use crate::error::Result;
use crate::hash::KeyHasher;
use crate::node::{self, BitmapNode, CollisionNode, Node, NodeRef, Slot};
use crate::splice;

/// A pair together with the hash of its key.
struct HashedEntry<K, V> {
    hash: i32,
    key: K,
    value: V,
}

/// Maps `key` to `value` in the subtree rooted at `node`, entered at `shift`.
///
/// Returns `node` itself (same `Arc`) when `key` is already mapped to an
/// equal value. `hasher` is only called to rehash a stored key that shares
/// a slot with `key`.
///
/// # Errors
///
/// Propagates the hasher's error.
pub fn set<K, V, H>(
    key: K,
    value: V,
    hash: i32,
    hasher: &H,
    shift: u32,
    node: &NodeRef<K, V>,
) -> Result<NodeRef<K, V>>
where
    K: Clone + PartialEq,
    V: Clone + PartialEq,
    H: KeyHasher<K> + ?Sized,
{
    let updated = match &**node {
        Node::Empty => Some(singleton(key, value, hash, shift)),
        Node::Collision(collision) => set_in_collision(collision, key, value),
        Node::Bitmap(bitmap) => set_in_bitmap(bitmap, key, value, hash, hasher, shift)?,
    };
    Ok(updated.map_or_else(|| Arc::clone(node), Arc::new))
}

fn singleton<K, V>(key: K, value: V, hash: i32, shift: u32) -> Node<K, V> {
    if shift >= node::HASH_BITS {
        Node::collision(Box::new([(key, value)]))
    } else {
        let bit = node::mask(node::fragment(hash, shift));
        Node::bitmap(bit, 0, Box::new([Slot::Entry(key, value)]))
    }
}

// ---------------------------------------------------------------------------
// Bitmap node insert
// ---------------------------------------------------------------------------

fn set_in_bitmap<K, V, H>(
    bitmap: &BitmapNode<K, V>,
    key: K,
    value: V,
    hash: i32,
    hasher: &H,
    shift: u32,
) -> Result<Option<Node<K, V>>>
where
    K: Clone + PartialEq,
    V: Clone + PartialEq,
    H: KeyHasher<K> + ?Sized,
{
    let bit = node::mask(node::fragment(hash, shift));
    let data_mask = bitmap.data_mask();
    let node_mask = bitmap.node_mask();

    if data_mask & bit != 0 {
        let pos = bitmap.entry_index(bit);
        let (existing_key, existing_value) = bitmap.entry(pos);

        if *existing_key == key {
            if *existing_value == value {
                return Ok(None);
            }
            let slots = splice::replace_at(bitmap.slots(), pos, Slot::Entry(key, value));
            return Ok(Some(Node::bitmap(data_mask, node_mask, slots)));
        }

        // Different key in the same slot → push both one level down.
        let existing = HashedEntry {
            hash: hasher.hash_key(existing_key)?,
            key: existing_key.clone(),
            value: existing_value.clone(),
        };
        let incoming = HashedEntry { hash, key, value };
        let child = merge_entries(shift + node::BITS_PER_LEVEL, existing, incoming);
        tracing::trace!(shift, "split inline entry into subtree");

        let new_node_mask = node_mask | bit;
        let child_at = bitmap.arity() - 1 - node::index(new_node_mask, bit);
        let slots = splice::splice_replace(
            bitmap.slots(),
            pos,
            1,
            child_at,
            &[Slot::Child(Arc::new(child))],
        );
        return Ok(Some(Node::bitmap(data_mask ^ bit, new_node_mask, slots)));
    }

    if node_mask & bit != 0 {
        let pos = bitmap.child_index(bit);
        let child = bitmap.child(pos);
        let new_child = set(key, value, hash, hasher, shift + node::BITS_PER_LEVEL, child)?;
        if Arc::ptr_eq(&new_child, child) {
            return Ok(None);
        }
        let slots = splice::replace_at(bitmap.slots(), pos, Slot::Child(new_child));
        return Ok(Some(Node::bitmap(data_mask, node_mask, slots)));
    }

    let pos = bitmap.entry_index(bit);
    let slots = splice::insert_pair(bitmap.slots(), pos, Slot::Entry(key, value));
    Ok(Some(Node::bitmap(data_mask | bit, node_mask, slots)))
}

/// Builds the subtree holding two entries that share every hash fragment
/// above `shift`.
///
/// Descends while the fragments agree, wrapping each level in a
/// single-child node. Once the hash is exhausted the pairs land in a
/// collision node, `existing` first.
fn merge_entries<K, V>(
    shift: u32,
    existing: HashedEntry<K, V>,
    incoming: HashedEntry<K, V>,
) -> Node<K, V> {
    if shift >= node::HASH_BITS {
        tracing::trace!("hash exhausted, creating collision node");
        return Node::collision(Box::new([
            (existing.key, existing.value),
            (incoming.key, incoming.value),
        ]));
    }

    let existing_frag = node::fragment(existing.hash, shift);
    let incoming_frag = node::fragment(incoming.hash, shift);

    if existing_frag == incoming_frag {
        let child = merge_entries(shift + node::BITS_PER_LEVEL, existing, incoming);
        return Node::bitmap(
            0,
            node::mask(existing_frag),
            Box::new([Slot::Child(Arc::new(child))]),
        );
    }

    let data_mask = node::mask(existing_frag) | node::mask(incoming_frag);
    let (first, second) = if existing_frag < incoming_frag {
        (existing, incoming)
    } else {
        (incoming, existing)
    };
    Node::bitmap(
        data_mask,
        0,
        Box::new([
            Slot::Entry(first.key, first.value),
            Slot::Entry(second.key, second.value),
        ]),
    )
}

// ---------------------------------------------------------------------------
// Collision node insert
// ---------------------------------------------------------------------------

fn set_in_collision<K, V>(collision: &CollisionNode<K, V>, key: K, value: V) -> Option<Node<K, V>>
where
    K: Clone + PartialEq,
    V: Clone + PartialEq,
{
    let pairs = collision.pairs();
    match collision.position(&key) {
        Some(pos) if pairs[pos].1 == value => None,
        Some(pos) => Some(Node::collision(splice::replace_at(pairs, pos, (key, value)))),
        None => Some(Node::collision(splice::insert_pair(
            pairs,
            pairs.len(),
            (key, value),
        ))),
    }
}
