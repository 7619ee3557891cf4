//! Iterator types for HAMT maps.

use crate::node::Node;

/// Iterator over references to key-value pairs of a trie.
///
/// Order follows the trie layout and carries no meaning.
pub struct Iter<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    pos: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Creates an iterator by collecting all entries of `root` via DFS.
    #[must_use]
    pub fn new(root: &'a Node<K, V>) -> Self {
        let mut entries = Vec::new();
        collect(root, &mut entries);
        Self { entries, pos: 0 }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.entries.get(self.pos).copied()?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// DFS collect all `(&K, &V)` from the subtree rooted at `node`.
fn collect<'a, K, V>(node: &'a Node<K, V>, out: &mut Vec<(&'a K, &'a V)>) {
    match node {
        Node::Empty => {}
        Node::Bitmap(bitmap) => {
            out.extend(bitmap.entries());
            for child in bitmap.children() {
                collect(child, out);
            }
        }
        Node::Collision(collision) => {
            out.extend(collision.pairs().iter().map(|(k, v)| (k, v)));
        }
    }
}
