//! `serde` support, enabled by the `serde` feature.
//!
//! Maps serialize as plain maps. Deserialization goes through
//! [`HamtMap::set`], so a key the hasher rejects becomes a deserializer error.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::KeyHasher;
use crate::map::HamtMap;

impl<K: Serialize, V: Serialize, H> Serialize for HamtMap<K, V, H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, K, V, H> Deserialize<'de> for HamtMap<K, V, H>
where
    K: Deserialize<'de> + Clone + PartialEq,
    V: Deserialize<'de> + Clone + PartialEq,
    H: KeyHasher<K> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HamtMapVisitor(PhantomData))
    }
}

struct HamtMapVisitor<K, V, H>(PhantomData<fn() -> (K, V, H)>);

impl<'de, K, V, H> Visitor<'de> for HamtMapVisitor<K, V, H>
where
    K: Deserialize<'de> + Clone + PartialEq,
    V: Deserialize<'de> + Clone + PartialEq,
    H: KeyHasher<K> + Default,
{
    type Value = HamtMap<K, V, H>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = HamtMap::with_hasher(H::default());
        while let Some((key, value)) = access.next_entry()? {
            map = map.set(key, value).map_err(de::Error::custom)?;
        }
        Ok(map)
    }
}
