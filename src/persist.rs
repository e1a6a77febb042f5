//! On-disk stores.
//!
//! `LocalStore` is the client's persisted map: one redb row per entry,
//! keyed `<namespace>_<entry>`, value is the JSON text. `JsonFileStore`
//! is the server's flat document: every entry is a top-level field of a
//! single JSON object, rewritten in full on each put.

use crate::store::{CollectionStore, StoreError, StoreResult};
use redb::{Database, TableDefinition};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const LOCAL_ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("local_entries");

// ── redb-backed local map ─────────────────────────────────────

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
    namespace: String,
}

impl LocalStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>, namespace: &str) -> StoreResult<Self> {
        let db = Database::create(path.as_ref())?;

        // Ensure the table exists so read transactions never miss it
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(LOCAL_ENTRIES)?;
        }
        txn.commit()?;

        tracing::debug!(path = %path.as_ref().display(), namespace, "opened local store");
        Ok(LocalStore {
            db: Arc::new(db),
            namespace: namespace.to_string(),
        })
    }

    fn row_key(&self, key: &str) -> String {
        format!("{}_{}", self.namespace, key)
    }
}

impl CollectionStore for LocalStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(LOCAL_ENTRIES)?;
        match table.get(self.row_key(key).as_str())? {
            Some(text) => Ok(Some(serde_json::from_str(text.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        let text = serde_json::to_string(&value)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(LOCAL_ENTRIES)?;
            table.insert(self.row_key(key).as_str(), text.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(LOCAL_ENTRIES)?;
            table.remove(self.row_key(key).as_str())?;
        }
        txn.commit()?;
        Ok(())
    }
}

// ── Flat JSON document ────────────────────────────────────────

/// The server's data file. Puts go through a sibling temp file and a
/// rename, so a reader never sees a half-written document.
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(JsonFileStore {
            path,
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> StoreResult<Map<String, Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Shape {
                key: self.path.display().to_string(),
                expected: "object",
            }),
        }
    }

    fn save_document(&self, document: Map<String, Value>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CollectionStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load_document()?.remove(key))
    }

    fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.load_document()?;
        document.insert(key.to_string(), value);
        self.save_document(document)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.load_document()?;
        if document.remove(key).is_some() {
            self.save_document(document)?;
        }
        Ok(())
    }
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task, TaskStatus};
    use crate::store::{Collection, CollectionStoreExt};

    fn sample_task(id: u64) -> Task {
        Task {
            id,
            title: "Payroll Processing".into(),
            assigned_to: "Theophilus Tettey Charwetey Martey".into(),
            assigned_to_id: "CSC/22/01/0217".into(),
            due_date: "2023-10-28".into(),
            priority: Priority::Medium,
            status: TaskStatus::PendingAcceptance,
        }
    }

    #[test]
    fn local_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.redb");

        {
            let store = LocalStore::open(&path, "smartoffice").unwrap();
            store.write(Collection::Tasks, &[sample_task(2)]).unwrap();
        }

        let store = LocalStore::open(&path, "smartoffice").unwrap();
        let tasks: Vec<Task> = store.read(Collection::Tasks).unwrap();
        assert_eq!(tasks, vec![sample_task(2)]);
    }

    #[test]
    fn local_store_namespaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.redb");
        let a = LocalStore::open(&path, "alpha").unwrap();
        a.write(Collection::Tasks, &[sample_task(1)]).unwrap();
        drop(a);

        let b = LocalStore::open(&path, "beta").unwrap();
        let tasks: Vec<Task> = b.read(Collection::Tasks).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn local_store_remove_clears_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.redb"), "smartoffice").unwrap();
        store.put("current_user", serde_json::json!({"id": "admin"})).unwrap();
        store.remove("current_user").unwrap();
        assert_eq!(store.get("current_user").unwrap(), None);
    }

    #[test]
    fn json_file_keeps_other_collections_on_put() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json")).unwrap();
        store.write(Collection::Tasks, &[sample_task(1)]).unwrap();
        store.write(Collection::Documents, &["handbook"]).unwrap();

        let raw: Value = serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["tasks"][0]["id"], 1);
        assert_eq!(raw["documents"][0], "handbook");
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn json_file_missing_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested/data.json")).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn json_file_rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(matches!(store.get("tasks"), Err(StoreError::Shape { .. })));
    }
}
