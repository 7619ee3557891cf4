//! Lookup by iterative descent over 5-bit hash fragments.

use crate::node::{self, Node};

/// Returns the value stored under `key` in the trie rooted at `node`.
///
/// `hash` must be the hash of `key`; the descent starts at shift 0.
#[must_use]
pub fn get<'a, K, V>(key: &K, hash: i32, node: &'a Node<K, V>) -> Option<&'a V>
where
    K: PartialEq,
{
    let mut node = node;
    let mut shift = 0;
    loop {
        match node {
            Node::Empty => return None,
            Node::Collision(collision) => return collision.get(key),
            Node::Bitmap(bitmap) => {
                let bit = node::mask(node::fragment(hash, shift));

                if bitmap.data_mask() & bit != 0 {
                    let (k, v) = bitmap.entry(bitmap.entry_index(bit));
                    return (k == key).then_some(v);
                }
                if bitmap.node_mask() & bit == 0 {
                    return None;
                }
                node = &**bitmap.child(bitmap.child_index(bit));
                shift += node::BITS_PER_LEVEL;
            }
        }
    }
}

/// Returns `true` if `key` is present in the trie rooted at `node`.
#[must_use]
pub fn has<K, V>(key: &K, hash: i32, node: &Node<K, V>) -> bool
where
    K: PartialEq,
{
    get(key, hash, node).is_some()
}
