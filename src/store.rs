use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};
use tracing::error;

use crate::models::{StatusFilter, Todo, TodoPatch};

const SCHEMA_VERSION: i32 = 1;

#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
    WriteConflict(String),
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Handle to the todo database. Cloning shares the underlying connection.
#[derive(Clone, Debug)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrate(&conn).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Store {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Closes the underlying connection if this is the last handle.
    pub fn close(self) -> Result<(), StoreError> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap();
                conn.close()
                    .map_err(|(_, e)| StoreError::Backend(e.to_string()))
            }
            // Other handles are still live; the last drop closes the connection.
            Err(_) => Ok(()),
        }
    }

    pub fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title, done_at FROM todos")?;
        let todos = stmt
            .query_map([], row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        // Full scan in key order; status filtering happens in memory.
        Ok(match filter {
            StatusFilter::All => todos,
            StatusFilter::Active => todos.into_iter().filter(|t| t.done_at.is_none()).collect(),
            StatusFilter::Done => todos.into_iter().filter(|t| t.done_at.is_some()).collect(),
        })
    }

    /// Insert-or-merge keyed by id: fields present in the patch win, absent
    /// fields keep their stored values. One transaction per call.
    pub fn upsert(&self, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let existing = tx
            .query_row(
                "SELECT id, title, done_at FROM todos WHERE id = ?1",
                [patch.id],
                row_to_todo,
            )
            .optional()
            .map_err(|e| {
                error!(id = patch.id, "reading todo before merge failed: {e}");
                StoreError::from(e)
            })?;

        let merged = merge(existing, patch);
        tx.execute(
            "INSERT OR REPLACE INTO todos (id, title, done_at) VALUES (?1, ?2, ?3)",
            (merged.id, &merged.title, merged.done_at),
        )?;
        tx.commit()
            .map_err(|e| StoreError::WriteConflict(e.to_string()))?;

        Ok(merged)
    }

    /// Deletes by id. Succeeds whether or not the record existed; the returned
    /// bool reports whether a row was actually removed.
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM todos WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL DEFAULT '',
                done_at INTEGER
            );

            CREATE INDEX IF NOT EXISTS todos_done_at ON todos(done_at);
            ",
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

fn row_to_todo(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        done_at: row.get(2)?,
    })
}

fn merge(existing: Option<Todo>, patch: &TodoPatch) -> Todo {
    let mut todo = existing.unwrap_or_else(|| Todo {
        id: patch.id,
        title: String::new(),
        done_at: None,
    });

    if let Some(title) = &patch.title {
        todo.title = title.clone();
    }
    if let Some(done_at) = patch.done_at {
        todo.done_at = done_at;
    }

    todo
}
