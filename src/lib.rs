//! Persistent hash map based on a lean HAMT.
//!
//! A Hash Array Mapped Trie partitions keys by successive 5-bit slices of
//! a 32-bit hash. Every update path-copies from the changed slot up to a
//! new root and shares all other subtrees with the previous version, so old
//! versions stay valid and cheap to keep around.
//!
//! # Key properties
//!
//! - **Structural sharing**: nodes live behind [`Arc`](std::sync::Arc) and
//!   are never mutated, so any number of versions and threads can read them
//! - **Identity-preserving no-ops**: `set` of an equal value and `del` of an
//!   absent key return the very same root
//! - **Canonical shape**: deletes collapse single-entry levels on the way up
//! - **Pluggable hashing**: any `Fn(&K) -> i32`, or the [`GenericHasher`]
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Layers
//!
//! - [`get`], [`has`], [`set`], [`del`] operate on bare [`NodeRef`] roots
//! - [`HamtMap`] pairs a root with its hash function
//!
//! # References
//!
//! - Bagwell, 2001, "Ideal Hash Trees"
//! - Steindorfer & Vinju, 2015, "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod hash;
pub mod iter;
pub mod node;
pub mod splice;

mod map;
mod ops;
#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use hash::{DynKey, GenericHash, GenericHasher, KeyHasher};
pub use map::HamtMap;
pub use node::{Node, NodeRef, empty};
pub use ops::del::del;
pub use ops::get::{get, has};
pub use ops::set::set;
