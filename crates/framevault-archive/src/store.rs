//! Transaction-Scoped Key-Value Handles
//!
//! The persistence layer is an external collaborator. Archivers and
//! metadata fetchers receive one of these handles, scoped to a transaction
//! the caller owns; this crate never opens or commits anything.
//!
//! Read-only vs write-capable is distinguished at the type level:
//! [`StoreRead`] for restore-side lookups, [`StoreWrite`] where archiving
//! or restoring legitimately persists (e.g. re-registering a sticker pack
//! key). A read path cannot be handed a write capability by accident.
//!
//! [`MemoryStore`] is the in-memory implementation used by tests and small
//! callers: a map behind the same interface, injected via constructor,
//! never a global.

use std::collections::HashMap;

use bytes::Bytes;

/// Read capability on the caller's transaction.
pub trait StoreRead {
    fn get(&self, collection: &str, key: &str) -> Option<Bytes>;
}

/// Write capability. Implies read.
pub trait StoreWrite: StoreRead {
    fn put(&mut self, collection: &str, key: &str, value: Bytes);
}

/// In-memory store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<(String, String), Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoreRead for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> Option<Bytes> {
        self.entries
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }
}

impl StoreWrite for MemoryStore {
    fn put(&mut self, collection: &str, key: &str, value: Bytes) {
        self.entries
            .insert((collection.to_string(), key.to_string()), value);
    }
}
