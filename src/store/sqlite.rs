use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::session::SessionStore;
use crate::util::{ensure_directory, now_utc_string};

pub struct SqliteSessionStore {
    connection: Connection,
}

impl SqliteSessionStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory(parent)?;
        }

        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        configure_connection(&connection)?;
        ensure_schema(&connection)?;

        Ok(Self { connection })
    }

    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory session store")?;
        ensure_schema(&connection)?;

        Ok(Self { connection })
    }
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session_entries (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create session_entries table")?;
    Ok(())
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read session entry {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.connection
            .execute(
                "
                INSERT INTO session_entries (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now_utc_string()],
            )
            .with_context(|| format!("failed to write session entry {key}"))?;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute("DELETE FROM session_entries WHERE key = ?1", params![key])
            .with_context(|| format!("failed to delete session entry {key}"))?;
        Ok(removed > 0)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut statement = self
            .connection
            .prepare(
                "
                SELECT key FROM session_entries
                WHERE substr(key, 1, length(?1)) = ?1
                ORDER BY key ASC
                ",
            )
            .context("failed to prepare session key query")?;

        let keys = statement
            .query_map(params![prefix], |row| row.get::<_, String>(0))
            .context("failed to query session keys")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("failed to read session keys")?;

        Ok(keys)
    }
}
