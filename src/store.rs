//! Collection store contract.
//!
//! A store is a flat map of named JSON entries. Each collection lives in
//! one entry and is always read and written whole; there is no query
//! language and no partial write. Backends: `persist::LocalStore` (redb),
//! `persist::JsonFileStore` (one JSON document), `MemoryStore` (tests).

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

// ── Collections ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Employees,
    Attendance,
    Leaves,
    Tasks,
    Documents,
    Finances,
    CurrentUser,
}

impl Collection {
    /// The six data collections, in seeding order. `CurrentUser` is a
    /// single record, not a collection, and is never seeded.
    pub const DATA: [Collection; 6] = [
        Collection::Employees,
        Collection::Attendance,
        Collection::Leaves,
        Collection::Tasks,
        Collection::Documents,
        Collection::Finances,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Attendance => "attendance",
            Collection::Leaves => "leaves",
            Collection::Tasks => "tasks",
            Collection::Documents => "documents",
            Collection::Finances => "finances",
            Collection::CurrentUser => "current_user",
        }
    }
}

/// Entry holding the seeded schema version.
pub const SCHEMA_KEY: &str = "schema_version";

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry `{key}` is not a JSON {expected}")]
    Shape { key: String, expected: &'static str },
    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

// ── Contract ──────────────────────────────────────────────────

/// Raw entry access. Writes replace the entry whole.
pub trait CollectionStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    fn put(&self, key: &str, value: Value) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Typed helpers on top of the raw contract.
pub trait CollectionStoreExt: CollectionStore {
    /// Read a collection. Missing entries read as empty.
    fn read<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        match self.get(collection.key())? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(_) => Err(StoreError::Shape {
                key: collection.key().to_string(),
                expected: "array",
            }),
        }
    }

    /// Replace a collection.
    fn write<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
        self.put(collection.key(), serde_json::to_value(records)?)
    }

    fn read_one<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Option<T>> {
        match self.get(collection.key())? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    fn write_one<T: Serialize>(&self, collection: Collection, record: &T) -> StoreResult<()> {
        self.put(collection.key(), serde_json::to_value(record)?)
    }
}

impl<S: CollectionStore + ?Sized> CollectionStoreExt for S {}

// ── In-memory backend ─────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
