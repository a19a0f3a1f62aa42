//! Store session on top of redb.
//!
//! A [`Store`] is opened once per invocation, either read-only or
//! read-write. Reads go through a [`Snapshot`] that pins one consistent
//! read transaction for its whole lifetime; writes go through a
//! [`WriteTxn`] that becomes durable only on [`WriteTxn::commit`].

use std::fs;
use std::path::PathBuf;

use redb::{
    Builder, Database, ReadOnlyTable, ReadTransaction, ReadableTable, TableDefinition,
    TableError, WriteTransaction,
};
use tracing::{debug, info};

use crate::config::{AccessMode, StoreConfig};
use crate::error::{Error, Result};

/// All entries, ordered by raw key bytes
const ENTRIES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("entries");

pub struct Store {
    db: Database,
    access: AccessMode,
    path: PathBuf,
}

impl Store {
    /// Open the store described by `config`.
    ///
    /// Read-only access requires an existing store file. Read-write access
    /// creates the directory and the file when they are missing.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let open_failed = |source: redb::Error| Error::StoreOpen {
            path: config.path.clone(),
            source,
        };

        let file = config.data_file();
        let mut builder = Builder::new();
        if let Some(bytes) = config.cache_size {
            builder.set_cache_size(bytes);
        }

        let db = match config.access {
            AccessMode::ReadOnly => builder.open(&file),
            AccessMode::ReadWrite => {
                if !config.path.is_file() {
                    fs::create_dir_all(config.dir())
                        .map_err(|e| open_failed(redb::Error::Io(e)))?;
                }
                builder.create(&file)
            }
        }
        .map_err(|e| open_failed(e.into()))?;

        info!(path = %file.display(), access = ?config.access, "store opened");
        Ok(Self {
            db,
            access: config.access,
            path: file,
        })
    }

    /// Run `f` against one consistent read snapshot.
    pub fn view<T>(&self, f: impl FnOnce(&Snapshot) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(ENTRIES) {
            Ok(table) => Some(table),
            // never written to; reads as empty
            Err(TableError::TableDoesNotExist(_)) => None,
            Err(e) => return Err(e.into()),
        };
        debug!(empty = table.is_none(), "read snapshot started");
        let snapshot = Snapshot { table, _txn: txn };
        f(&snapshot)
    }

    /// Start a write transaction. Refused on a read-only store.
    pub fn begin_write(&self) -> Result<WriteTxn> {
        if self.access == AccessMode::ReadOnly {
            return Err(Error::ReadOnly);
        }
        let txn = self.db.begin_write()?;
        debug!("write transaction started");
        Ok(WriteTxn { txn })
    }

    /// Release the store handle
    pub fn close(self) {
        let Self { db, access, path } = self;
        drop(db);
        info!(path = %path.display(), ?access, "store closed");
    }
}

/// A point-in-time read view of the store
pub struct Snapshot {
    table: Option<ReadOnlyTable<&'static [u8], &'static [u8]>>,
    _txn: ReadTransaction,
}

impl Snapshot {
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(table) = &self.table else {
            return Ok(None);
        };
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    /// Visit every entry in key order
    pub fn scan(&self, mut visit: impl FnMut(&[u8], &[u8]) -> Result<()>) -> Result<()> {
        let Some(table) = &self.table else {
            return Ok(());
        };
        for item in table.iter()? {
            let (key, value) = item?;
            visit(key.value(), value.value())?;
        }
        Ok(())
    }
}

/// A read-write unit of work; dropped without commit means aborted
pub struct WriteTxn {
    txn: WriteTransaction,
}

impl WriteTxn {
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let table = self.txn.open_table(ENTRIES)?;
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut table = self.txn.open_table(ENTRIES)?;
        table.insert(key, value)?;
        Ok(())
    }

    pub fn commit(self) -> Result<()> {
        self.txn.commit().map_err(Error::Commit)?;
        debug!("write transaction committed");
        Ok(())
    }

    pub fn abort(self) -> Result<()> {
        self.txn.abort()?;
        debug!("write transaction aborted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir, access: AccessMode) -> Result<Store> {
        Store::open(&StoreConfig::new(dir.path().join("db"), access))
    }

    #[test]
    fn test_read_only_requires_existing_store() {
        let dir = TempDir::new().unwrap();
        let err = open(&dir, AccessMode::ReadOnly).err().unwrap();
        assert!(matches!(err, Error::StoreOpen { .. }));
    }

    #[test]
    fn test_write_commit_then_read() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir, AccessMode::ReadWrite).unwrap();
        let txn = store.begin_write().unwrap();
        txn.set(b"b", b"2").unwrap();
        txn.set(b"a", b"1").unwrap();
        assert_eq!(txn.get(b"a").unwrap(), Some(b"1".to_vec()));
        txn.commit().unwrap();
        store.close();

        let store = open(&dir, AccessMode::ReadOnly).unwrap();
        let entries = store
            .view(|snapshot| {
                assert_eq!(snapshot.get(b"b")?, Some(b"2".to_vec()));
                assert_eq!(snapshot.get(b"c")?, None);
                let mut entries = Vec::new();
                snapshot.scan(|k, v| {
                    entries.push((k.to_vec(), v.to_vec()));
                    Ok(())
                })?;
                Ok(entries)
            })
            .unwrap();
        assert_eq!(
            entries,
            vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]
        );
        assert!(matches!(store.begin_write(), Err(Error::ReadOnly)));
    }

    #[test]
    fn test_abort_discards_write() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir, AccessMode::ReadWrite).unwrap();
        let txn = store.begin_write().unwrap();
        txn.set(b"k", b"v").unwrap();
        txn.abort().unwrap();
        let value = store.view(|snapshot| snapshot.get(b"k")).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_fresh_store_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir, AccessMode::ReadWrite).unwrap();
        let count = store
            .view(|snapshot| {
                let mut count = 0;
                snapshot.scan(|_, _| {
                    count += 1;
                    Ok(())
                })?;
                Ok(count)
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
