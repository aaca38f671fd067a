//! Hashing collections used across the crate. FxHash is faster than SipHash
//! for the small string and integer keys we index by, and nothing here is
//! exposed to untrusted key sets.

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

// FxHashMap is std's HashMap with a different hasher, so std's entry types
// apply unchanged.
pub use std::collections::hash_map;
