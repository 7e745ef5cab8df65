use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

use crate::error::AppResult;

/// Durable named slots holding serialized values.
pub trait SlotStorage: Send + Sync {
    fn read(&self, slot: &str) -> AppResult<Option<String>>;

    fn write(&self, slot: &str, value: &str) -> AppResult<()>;
}

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        log::info!("Opened slot storage at {:?}", path);
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SlotStorage for SqliteStorage {
    fn read(&self, slot: &str) -> AppResult<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT value FROM slots WHERE name = ?1")?;
        let value = stmt.query_row((slot,), |row| row.get(0)).optional()?;
        log::debug!("Read slot {slot}: {}", if value.is_some() { "hit" } else { "empty" });
        Ok(value)
    }

    fn write(&self, slot: &str, value: &str) -> AppResult<()> {
        self.conn.lock().execute(
            "INSERT INTO slots (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            (slot, value),
        )?;
        log::debug!("Wrote slot {slot} ({} bytes)", value.len());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: &str) -> AppResult<Option<String>> {
        Ok(self.slots.lock().get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> AppResult<()> {
        self.slots.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_slots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.db");

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.read("likes").unwrap(), None);
        storage.write("likes", "[1]").unwrap();
        storage.write("likes", "[1,2]").unwrap();
        drop(storage);

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.read("likes").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.read("other").unwrap(), None);
    }

    #[test]
    fn memory_slots_are_independent() {
        let storage = MemoryStorage::new();
        storage.write("a", "1").unwrap();
        storage.write("b", "2").unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));
    }
}
