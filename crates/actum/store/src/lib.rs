//! Actum Store - persistence for rules and actions
//!
//! The engine depends on a narrow deterministic key-value interface
//! ([`Kv`]), injected per call rather than referenced as a singleton. The
//! in-memory backend is the deterministic reference adapter; production
//! deployments supply the chain's transactional store behind the same
//! trait.

#![deny(unsafe_code)]

pub mod actions;
pub mod error;
pub mod kv;
pub mod rules;

pub use actions::ActionStore;
pub use error::{StoreError, StoreResult};
pub use kv::{Kv, MemKv, Overlay};
pub use rules::{RulePatch, RuleStore};

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

/// Bump and persist a monotonic sequence stored under `key`.
pub(crate) fn next_seq(kv: &mut dyn Kv, key: &[u8]) -> u64 {
    let current = kv
        .get(key)
        .and_then(|b| <[u8; 8]>::try_from(b.as_slice()).ok())
        .map(u64::from_be_bytes)
        .unwrap_or(0);
    let next = current + 1;
    kv.set(key, &next.to_be_bytes());
    next
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StoreError::Codec(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Codec(e.to_string()))
}
