use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );",
)];

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn latest_migration_version() -> i64 {
        MIGRATIONS.last().map(|(version, _)| *version).unwrap_or(0)
    }

    pub fn current_schema_version(&self) -> Result<i64, rusqlite::Error> {
        self.conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
    }

    pub fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        let current = self.current_schema_version()?;
        for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
            self.conn.execute_batch(sql)?;
            self.conn
                .pragma_update(None, "user_version", version)?;
            tracing::debug!(version, "applied migration");
        }
        Ok(())
    }

    pub fn get_kv(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }

    pub fn set_kv(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    pub fn delete_kv(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}
