//! Hash contract and the generic default hasher.
//!
//! The trie consumes hashes as opaque 32-bit signed integers produced by a
//! [`KeyHasher`]. Any `Fn(&K) -> i32` is a hasher; [`GenericHasher`] is the
//! default one and understands the key types listed on [`GenericHash`].

use std::rc::Rc;
use std::sync::Arc;

use crate::error::{Error, Result};

/// First and second rounds of the integer finalizer share this multiplier.
const MIX_MULTIPLIER: u32 = 0x045D_9F3B;

/// 2³², used to reduce floats modulo the 32-bit word.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Maps a key to a 32-bit hash.
///
/// Implementations must be deterministic: the trie re-hashes keys it already
/// stores when two keys share a slot, and a hasher that changes its answer
/// leaves the container with duplicate or unreachable entries.
pub trait KeyHasher<K: ?Sized> {
    /// Hashes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnhashableKey`] if the hasher does not support the
    /// key's runtime type.
    fn hash_key(&self, key: &K) -> Result<i32>;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> i32,
{
    fn hash_key(&self, key: &K) -> Result<i32> {
        Ok(self(key))
    }
}

/// The default hasher, delegating to [`GenericHash`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericHasher;

impl<K: GenericHash + ?Sized> KeyHasher<K> for GenericHasher {
    fn hash_key(&self, key: &K) -> Result<i32> {
        key.generic_hash()
            .inspect_err(|err| tracing::debug!(%err, "generic hasher rejected key"))
    }
}

// ---------------------------------------------------------------------------
// Hash primitives
// ---------------------------------------------------------------------------

/// Integer finalizer with avalanche behaviour.
///
/// `k = ((k >>> 16) ^ k) * 0x45d9f3b` twice, then `(k >>> 16) ^ k`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn mix_int(key: u32) -> i32 {
    let mut k = key;
    k = ((k >> 16) ^ k).wrapping_mul(MIX_MULTIPLIER);
    k = ((k >> 16) ^ k).wrapping_mul(MIX_MULTIPLIER);
    ((k >> 16) ^ k) as i32
}

/// SDBM string hash over UTF-16 code units.
#[must_use]
pub fn sdbm_hash(text: &str) -> i32 {
    sdbm_units(text.encode_utf16())
}

fn sdbm_units(units: impl IntoIterator<Item = u16>) -> i32 {
    units.into_iter().fold(0_i32, |hash, unit| {
        i32::from(unit)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Reduces a float to its 32-bit integer word: truncation toward zero,
/// modulo 2³². NaN and infinities map to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_word(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(TWO_POW_32) as u32
}

// ---------------------------------------------------------------------------
// GenericHash
// ---------------------------------------------------------------------------

/// Key types understood by [`GenericHasher`].
///
/// - `false`, `()` and `None` hash to `0`; `true` is not a supported key.
/// - Integers and floats are reduced to 32 bits and run through [`mix_int`].
/// - Strings and chars use [`sdbm_hash`].
/// - Smart pointers and `Option` delegate to their contents.
/// - [`DynKey`] dispatches on its runtime variant.
pub trait GenericHash {
    /// Hashes `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnhashableKey`] naming the runtime type when the
    /// value is not a supported key.
    fn generic_hash(&self) -> Result<i32>;
}

impl GenericHash for bool {
    fn generic_hash(&self) -> Result<i32> {
        if *self {
            Err(Error::UnhashableKey { type_name: "boolean" })
        } else {
            Ok(0)
        }
    }
}

impl GenericHash for () {
    fn generic_hash(&self) -> Result<i32> {
        Ok(0)
    }
}

impl<T: GenericHash> GenericHash for Option<T> {
    fn generic_hash(&self) -> Result<i32> {
        self.as_ref().map_or(Ok(0), GenericHash::generic_hash)
    }
}

macro_rules! integer_generic_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GenericHash for $ty {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn generic_hash(&self) -> Result<i32> {
                    Ok(mix_int(*self as u32))
                }
            }
        )*
    };
}

integer_generic_hash!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl GenericHash for f64 {
    fn generic_hash(&self) -> Result<i32> {
        Ok(mix_int(float_word(*self)))
    }
}

impl GenericHash for f32 {
    fn generic_hash(&self) -> Result<i32> {
        Ok(mix_int(float_word(f64::from(*self))))
    }
}

impl GenericHash for str {
    fn generic_hash(&self) -> Result<i32> {
        Ok(sdbm_hash(self))
    }
}

impl GenericHash for String {
    fn generic_hash(&self) -> Result<i32> {
        Ok(sdbm_hash(self))
    }
}

impl GenericHash for char {
    fn generic_hash(&self) -> Result<i32> {
        let mut buf = [0_u16; 2];
        Ok(sdbm_units(self.encode_utf16(&mut buf).iter().copied()))
    }
}

impl<T: GenericHash + ?Sized> GenericHash for &T {
    fn generic_hash(&self) -> Result<i32> {
        (**self).generic_hash()
    }
}

impl<T: GenericHash + ?Sized> GenericHash for Box<T> {
    fn generic_hash(&self) -> Result<i32> {
        (**self).generic_hash()
    }
}

impl<T: GenericHash + ?Sized> GenericHash for Rc<T> {
    fn generic_hash(&self) -> Result<i32> {
        (**self).generic_hash()
    }
}

impl<T: GenericHash + ?Sized> GenericHash for Arc<T> {
    fn generic_hash(&self) -> Result<i32> {
        (**self).generic_hash()
    }
}

// ---------------------------------------------------------------------------
// DynKey
// ---------------------------------------------------------------------------

/// A dynamically-typed key.
///
/// Equality is strict: numbers compare by value (so `NaN` never equals
/// itself), text by content, and functions and lists by identity.
#[derive(Debug, Clone)]
pub enum DynKey {
    /// No value.
    Absent,
    /// A boolean. Only `false` is hashable.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(Arc<str>),
    /// A function, hashed through its source text.
    Function {
        /// Textual form of the function.
        source: Arc<str>,
    },
    /// A list. Never hashable.
    List(Arc<[DynKey]>),
}

impl DynKey {
    /// Creates a function key from its source text.
    #[must_use]
    pub fn function(source: &str) -> Self {
        Self::Function {
            source: Arc::from(source),
        }
    }

    /// Runtime type name, as reported by [`Error::UnhashableKey`].
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Function { .. } => "function",
            Self::List(_) => "list",
        }
    }
}

impl PartialEq for DynKey {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Function { source: a }, Self::Function { source: b }) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl GenericHash for DynKey {
    fn generic_hash(&self) -> Result<i32> {
        match self {
            Self::Absent | Self::Bool(false) => Ok(0),
            Self::Number(n) => n.generic_hash(),
            Self::Text(text) | Self::Function { source: text } => Ok(sdbm_hash(text)),
            Self::Bool(true) | Self::List(_) => Err(Error::UnhashableKey {
                type_name: self.type_name(),
            }),
        }
    }
}

impl From<bool> for DynKey {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for DynKey {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DynKey {
    fn from(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl From<String> for DynKey {
    fn from(value: String) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl<T: Into<Self>> From<Option<T>> for DynKey {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}
