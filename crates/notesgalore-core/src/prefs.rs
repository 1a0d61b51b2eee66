use crate::db::Database;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub enum PreferenceError {
    Db(rusqlite::Error),
    Io(std::io::Error),
}

impl From<rusqlite::Error> for PreferenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err)
    }
}

impl From<std::io::Error> for PreferenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceError::Db(err) => write!(f, "preference db error: {err}"),
            PreferenceError::Io(err) => write!(f, "preference io error: {err}"),
        }
    }
}

impl std::error::Error for PreferenceError {}

/// Synchronous string key-value storage that outlives the process.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Preferences kept in the `kv` table. Values are cached so a failed write
/// still reads back for the rest of the session.
pub struct SqlitePreferences {
    db: Database,
    cache: HashMap<String, String>,
}

impl SqlitePreferences {
    pub fn open(path: &Path) -> Result<Self, PreferenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_database(Database::open(path)?)
    }

    pub fn in_memory() -> Result<Self, PreferenceError> {
        Self::from_database(Database::new_in_memory()?)
    }

    pub fn from_database(db: Database) -> Result<Self, PreferenceError> {
        db.run_migrations()?;
        Ok(Self {
            db,
            cache: HashMap::new(),
        })
    }

    pub fn try_set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.cache.insert(key.to_string(), value.to_string());
        self.db.set_kv(key, value)?;
        Ok(())
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.cache.get(key) {
            return Some(value.clone());
        }
        match self.db.get_kv(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = ?err, "failed to read preference");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = self.try_set(key, value) {
            tracing::warn!(key, error = ?err, "failed to persist preference");
        }
    }
}
