use std::fs;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// File name of the database inside the store directory.
pub const DB_FILE_NAME: &str = "memo.redb";

/// Single table holding every collection document.
const COLLECTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Persistent key-value store backed by redb.
///
/// The store lives in one file, `<dir>/memo.redb`. Every `put` is its own
/// committed write transaction, so a single-key write is atomic and durable
/// once it returns. The file is closed when the store is dropped.
pub struct RedbKvStore {
    db: Database,
    path: PathBuf,
}

impl RedbKvStore {
    /// Open (or create) the store in directory `dir`.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(DB_FILE_NAME);

        let open_err = |reason: String| StoreError::Open {
            path: path.clone(),
            reason,
        };
        let db = Database::create(&path).map_err(|e| open_err(e.to_string()))?;

        // Create the table up front so readers never see it missing.
        let txn = db.begin_write().map_err(|e| open_err(e.to_string()))?;
        txn.open_table(COLLECTIONS)
            .map_err(|e| open_err(e.to_string()))?;
        txn.commit().map_err(|e| open_err(e.to_string()))?;

        info!(path = %path.display(), "opened store");
        Ok(Self { db, path })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for RedbKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::read(key, e))?;
        let table = txn
            .open_table(COLLECTIONS)
            .map_err(|e| StoreError::read(key, e))?;
        let value = table
            .get(key)
            .map_err(|e| StoreError::read(key, e))?
            .map(|guard| guard.value().to_vec());
        debug!(key, found = value.is_some(), "store get");
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(|e| StoreError::write(key, e))?;
        {
            let mut table = txn
                .open_table(COLLECTIONS)
                .map_err(|e| StoreError::write(key, e))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::write(key, e))?;
        }
        txn.commit().map_err(|e| StoreError::write(key, e))?;
        debug!(key, len = value.len(), "store put");
        Ok(())
    }
}

impl std::fmt::Debug for RedbKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKvStore")
            .field("path", &self.path)
            .finish()
    }
}
