//! Persistent key-value store for the service's own records, backed by redb.
//!
//! Two tables, both keyed by UTF-8 name with JSON-encoded values:
//!
//! - `settings` holds the last-run record ([`RunResult`]).
//! - `schedules` holds periodic trigger registrations ([`Schedule`]), one
//!   per hook name.

mod schedule;
mod settings;

pub use schedule::{Recurrence, Schedule};
pub use settings::{RunResult, RunTrigger, LAST_RUN_KEY};

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use redb::{Database, DatabaseError, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Result, SpotlightError};

type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

const SETTINGS: JsonTable = TableDefinition::new("settings");
const SCHEDULES: JsonTable = TableDefinition::new("schedules");

/// How long an operation waits for another process to release the file.
const OPEN_ATTEMPTS: u32 = 100;
const OPEN_BACKOFF: Duration = Duration::from_millis(20);

fn db_err(e: impl std::fmt::Display) -> SpotlightError {
    SpotlightError::Store(e.to_string())
}

/// Handle on the redb file.
///
/// redb locks the file exclusively while a `Database` is open. The file is
/// opened for one operation at a time and shared between `spotlight serve`
/// and the CLI.
pub struct Store {
    path: PathBuf,
    open: Mutex<()>,
}

impl Store {
    /// Create the redb database at `path` if needed, along with both tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            path: path.to_path_buf(),
            open: Mutex::new(()),
        };
        store.with_db(|db| {
            let wt = db.begin_write().map_err(db_err)?;
            wt.open_table(SETTINGS).map_err(db_err)?;
            wt.open_table(SCHEDULES).map_err(db_err)?;
            wt.commit().map_err(db_err)?;
            Ok(())
        })?;
        Ok(store)
    }

    /// Run `f` against the database, holding the file lock only for its
    /// duration. Everything inside `f` is exclusive across processes.
    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let _guard = self
            .open
            .lock()
            .map_err(|_| SpotlightError::Store("store lock poisoned".into()))?;
        let db = self.create_db()?;
        f(&db)
    }

    fn create_db(&self) -> Result<Database> {
        let mut attempt = 1;
        loop {
            match Database::create(&self.path) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) if attempt < OPEN_ATTEMPTS => {
                    attempt += 1;
                    std::thread::sleep(OPEN_BACKOFF);
                }
                Err(e) => return Err(db_err(e)),
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, table: JsonTable, key: &str) -> Result<Option<T>> {
        self.with_db(|db| read_json(db, table, key))
    }

    fn put_json<T: Serialize>(&self, table: JsonTable, key: &str, value: &T) -> Result<()> {
        self.with_db(|db| write_json(db, table, key, value))
    }

    /// Returns whether the key was present.
    fn remove(&self, table: JsonTable, key: &str) -> Result<bool> {
        self.with_db(|db| {
            let wt = db.begin_write().map_err(db_err)?;
            let existed = {
                let mut table = wt.open_table(table).map_err(db_err)?;
                let removed = table.remove(key).map_err(db_err)?;
                removed.is_some()
            };
            wt.commit().map_err(db_err)?;
            Ok(existed)
        })
    }

    #[cfg(test)]
    fn list_json<T: DeserializeOwned>(&self, table: JsonTable) -> Result<Vec<T>> {
        self.with_db(|db| {
            let rt = db.begin_read().map_err(db_err)?;
            let table = rt.open_table(table).map_err(db_err)?;
            let mut out = Vec::new();
            for entry in table.iter().map_err(db_err)? {
                let (_, v) = entry.map_err(db_err)?;
                out.push(serde_json::from_slice(v.value())?);
            }
            Ok(out)
        })
    }
}

fn read_json<T: DeserializeOwned>(db: &Database, table: JsonTable, key: &str) -> Result<Option<T>> {
    let rt = db.begin_read().map_err(db_err)?;
    let table = rt.open_table(table).map_err(db_err)?;
    let Some(guard) = table.get(key).map_err(db_err)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_slice(guard.value())?))
}

fn write_json<T: Serialize>(db: &Database, table: JsonTable, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    let wt = db.begin_write().map_err(db_err)?;
    {
        let mut table = wt.open_table(table).map_err(db_err)?;
        table.insert(key, bytes.as_slice()).map_err(db_err)?;
    }
    wt.commit().map_err(db_err)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn open_tmp() -> (tempfile::TempDir, Store) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Store::open(&dir.path().join("test.redb")).unwrap();
    (dir, store)
}
