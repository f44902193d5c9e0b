//! Key-value backends the event store persists into.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AgendaError, AgendaResult};

/// Opaque string storage keyed by fixed names.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> AgendaResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AgendaResult<()>;
}

/// In-process storage. Writes can be made to fail to simulate an unavailable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AgendaResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AgendaResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AgendaError::PersistenceWrite(format!(
                "backend refused write to '{key}'"
            )));
        }
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AgendaResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> AgendaResult<()> {
        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            let path = self.path_for(key);
            let temp = self.dir.join(format!("{key}.json.tmp"));

            std::fs::write(&temp, value)?;
            std::fs::rename(&temp, &path)
        };

        write().map_err(|e| {
            AgendaError::PersistenceWrite(format!("{}: {e}", self.path_for(key).display()))
        })
    }
}
