//! The process-wide external-type registry (§4.9, §6.1).
//!
//! Reader functions can hand back an [`ExternalValue`] — an opaque
//! `payload`/`type_id` pair this crate never interprets itself — so a host
//! can embed its own types in a parsed tree. Structural equality and hashing
//! need *some* answer for two externals of the same type, and the contract
//! only promises one when the host registers `equal_fn`/`hash_fn` for that
//! `type_id`; without one, externals fall back to pointer/payload identity,
//! which is what [`crate::equality::value_equal`]'s `ExternalValue: PartialEq`
//! derive already gives for free.
//!
//! `type_id` 0 is reserved invalid, matching §5's resource-ownership note.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::value::ExternalValue;
use crate::Arena;

pub type ExternalEqualFn = fn(ExternalValue, ExternalValue) -> bool;
pub type ExternalHashFn = fn(ExternalValue) -> u64;

#[derive(Clone, Copy)]
struct ExternalTypeOps {
    equal_fn: Option<ExternalEqualFn>,
    hash_fn: Option<ExternalHashFn>,
}

/// Process-wide `type_id -> (equal_fn, hash_fn)` table.
///
/// §5 calls this out explicitly as the one piece of genuinely global mutable
/// state besides the singletons; it is a convenience default, not the only
/// way to use externals — an embedder that wants an injectable registry
/// instead of a process-wide one can construct its own `ExternalTypeRegistry`
/// and route lookups through it directly rather than through the process
/// singleton the free functions below use.
#[derive(Default)]
pub struct ExternalTypeRegistry {
    types: RwLock<HashMap<u32, ExternalTypeOps>>,
}

impl ExternalTypeRegistry {
    pub fn new() -> Self {
        ExternalTypeRegistry::default()
    }

    /// Register optional equality/hash functions for `type_id`. `type_id`
    /// must not be 0 (reserved invalid).
    pub fn register(
        &self,
        type_id: u32,
        equal_fn: Option<ExternalEqualFn>,
        hash_fn: Option<ExternalHashFn>,
    ) {
        debug_assert_ne!(type_id, 0, "type_id 0 is reserved invalid");
        self.types
            .write()
            .unwrap()
            .insert(type_id, ExternalTypeOps { equal_fn, hash_fn });
    }

    pub fn unregister(&self, type_id: u32) {
        self.types.write().unwrap().remove(&type_id);
    }

    /// Structural equality for two externals, falling back to raw
    /// `(type_id, payload)` identity when no `equal_fn` is registered for
    /// either side's type (or the types differ).
    pub fn equal(&self, a: ExternalValue, b: ExternalValue) -> bool {
        if a.type_id != b.type_id {
            return false;
        }
        match self.types.read().unwrap().get(&a.type_id) {
            Some(ops) => match ops.equal_fn {
                Some(f) => f(a, b),
                None => a.payload == b.payload,
            },
            None => a.payload == b.payload,
        }
    }

    /// Structural hash for an external, falling back to hashing the raw
    /// `(type_id, payload)` pair when no `hash_fn` is registered.
    pub fn hash(&self, value: ExternalValue) -> u64 {
        match self.types.read().unwrap().get(&value.type_id) {
            Some(ops) => match ops.hash_fn {
                Some(f) => f(value),
                None => default_hash(value),
            },
            None => default_hash(value),
        }
    }
}

fn default_hash(value: ExternalValue) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.type_id.hash(&mut hasher);
    value.payload.hash(&mut hasher);
    hasher.finish()
}

static REGISTRY: std::sync::OnceLock<ExternalTypeRegistry> = std::sync::OnceLock::new();

fn process_registry() -> &'static ExternalTypeRegistry {
    REGISTRY.get_or_init(ExternalTypeRegistry::new)
}

/// Register `equal_fn`/`hash_fn` for `type_id` in the process-wide registry.
/// `type_id` 0 is reserved invalid.
pub fn external_register_type(
    type_id: u32,
    equal_fn: Option<ExternalEqualFn>,
    hash_fn: Option<ExternalHashFn>,
) {
    process_registry().register(type_id, equal_fn, hash_fn);
}

pub(crate) fn process_equal(a: ExternalValue, b: ExternalValue) -> bool {
    process_registry().equal(a, b)
}

pub(crate) fn process_hash(value: ExternalValue) -> u64 {
    process_registry().hash(value)
}

/// Build an `External` value carrying `payload`/`type_id`, allocated through
/// `arena` per §5's reader-function resource-ownership rule. Reader
/// functions should prefer this over constructing `Value` literals by hand.
pub fn external_create<'a>(
    arena: &'a Arena,
    payload: usize,
    type_id: u32,
) -> &'a crate::value::Value<'a> {
    arena.alloc(crate::value::Value::new(crate::value::ValueKind::External(
        ExternalValue { type_id, payload },
    )))
}

/// Unwrap an `External` value's payload and type id, or `None` if `value`
/// is not an `External`.
pub fn external_get(value: &crate::value::Value<'_>) -> Option<(usize, u32)> {
    value
        .as_external()
        .map(|ext| (ext.payload, ext.type_id))
}
