//! Error type shared by the hash contract, the trie and the map facade.

/// Errors produced while hashing keys.
///
/// The trie itself never fails; every error originates in a
/// [`KeyHasher`](crate::hash::KeyHasher) and is propagated unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The key's runtime type is not supported by the hasher.
    #[error("key of type `{type_name}` cannot be hashed")]
    UnhashableKey {
        /// Name of the offending runtime type.
        type_name: &'static str,
    },
}

/// Result alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
