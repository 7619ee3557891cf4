//! Trie operations over [`Node`](crate::node::Node) roots.

pub mod del;
pub mod get;
pub mod set;
