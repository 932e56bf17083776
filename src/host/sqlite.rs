use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::config::UPDATE_TRANSIENT;
use crate::host::store::{StoreError, UpdateStore, UpdateTransient};

/// Update store persisted in a SQLite database, so checks survive between runs
pub struct SqliteUpdateStore {
    conn: Mutex<Connection>,
}

impl SqliteUpdateStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening update store at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        Ok(store)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transients (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table_name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}

impl UpdateStore for SqliteUpdateStore {
    fn load(&self) -> Result<Option<UpdateTransient>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM transients WHERE name = ?1",
                params![UPDATE_TRANSIENT],
                |row| row.get(0),
            )
            .optional()?;

        let Some(value) = value else {
            debug!("Transient {} not set", UPDATE_TRANSIENT);
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&value)?))
    }

    fn save(&self, transient: &UpdateTransient) -> Result<(), StoreError> {
        let value = serde_json::to_string(transient)?;
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            r#"
            INSERT INTO transients (name, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![UPDATE_TRANSIENT, value, Utc::now().timestamp_millis()],
        )?;

        debug!("Saved transient {}", UPDATE_TRANSIENT);
        Ok(())
    }
}
