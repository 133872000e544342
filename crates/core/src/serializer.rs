// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Serializer probe.
//!
//! The recognized set — integers, floats, strings, byte strings, ordered
//! sequences, sets, mappings, tuples, the null value, plus logger handles
//! treated as opaque sentinels — is exactly the set of things
//! `serde_json::Value` can represent. So the probe *is* an attempt to
//! serialize: no recursive deep-copy is performed and containers are
//! accepted on face value, since `serde_json::to_value` doesn't copy
//! anything the caller doesn't already own.
//!
//! Because attributes are collected behind a type-erased handle (Rust has
//! no runtime attribute introspection), the probe is expressed as an
//! object-safe trait rather than a free function over generics.

/// A value that can be asked whether it belongs in the shared store.
///
/// Blanket-implemented for anything `Serialize`; a `Logger` handle gets its
/// own `Serialize` impl that always succeeds with a fixed sentinel, which is
/// how "logger handles are proxy-safe sentinels" falls out of the same
/// mechanism without special-casing the probe itself.
pub trait Probed: Send + Sync + 'static {
    fn to_json(&self) -> Option<serde_json::Value>;
}

impl<T> Probed for T
where
    T: serde::Serialize + Send + Sync + 'static,
{
    fn to_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// Run the serializer probe on a type-erased attribute value.
pub fn probe(value: &dyn Probed) -> bool {
    value.to_json().is_some()
}

/// Log the warning for a failed probe. The message format is part of this
/// crate's observable behavior, not an implementation detail — keep it
/// stable.
pub fn warn_unserializable(attribute_name: &str) {
    tracing::warn!("[dynamic_init] cannot serialize attribute [{attribute_name}].");
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
