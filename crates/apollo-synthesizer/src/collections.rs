//! Collection aliases backed by `ahash`.
//!
//! Index maps and sets keep insertion order, so everything iterated from them
//! (schema types, fields, variables) comes out in a deterministic order.

use indexmap::IndexMap as IM;
use indexmap::IndexSet as IS;

pub type IndexMap<K, V> = IM<K, V, ahash::RandomState>;
pub type IndexSet<T> = IS<T, ahash::RandomState>;
pub type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
