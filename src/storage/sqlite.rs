use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Result as SqlResult, Row, params};

use crate::common::{Message, MessagePage};

use super::cursor::{self, CursorOptions, UnknownCursorPolicy};
use super::{MessageStore, StoreError, new_message};

/// SQLite-backed message store. `seq` carries creation order; ids stay opaque.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    options: CursorOptions,
}

impl SqliteStore {
    /// Open (or create) a database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: CursorOptions) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?, options)
    }

    pub fn in_memory(options: CursorOptions) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, options)
    }

    fn from_connection(conn: Connection, options: CursorOptions) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            options,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn init_schema(conn: &Connection) -> SqlResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS messages (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL,
            text TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn row_to_message(row: &Row<'_>) -> SqlResult<Message> {
    Ok(Message {
        id: row.get(0)?,
        username: row.get(1)?,
        text: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

fn latest(conn: &Connection, limit: usize) -> SqlResult<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, text, timestamp FROM (
             SELECT seq, id, username, text, timestamp
             FROM messages
             ORDER BY seq DESC
             LIMIT ?1
         ) ORDER BY seq ASC",
    )?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let messages = stmt
        .query_map(params![limit], row_to_message)?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(messages)
}

fn after(conn: &Connection, seq: i64) -> SqlResult<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, text, timestamp
         FROM messages
         WHERE seq > ?1
         ORDER BY seq ASC",
    )?;
    let messages = stmt
        .query_map(params![seq], row_to_message)?
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(messages)
}

impl MessageStore for SqliteStore {
    fn append(&self, username: &str, text: &str) -> Result<Message, StoreError> {
        let conn = self.lock()?;
        let message = new_message(username, text);
        conn.execute(
            "INSERT INTO messages (id, username, text, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![message.id, message.username, message.text, message.timestamp],
        )?;
        Ok(message)
    }

    fn list_since(&self, cursor: Option<&str>) -> Result<MessagePage, StoreError> {
        let conn = self.lock()?;

        let Some(cursor) = cursor::normalize(cursor) else {
            return Ok(cursor::into_page(latest(&conn, self.options.history_limit)?, None));
        };

        let seq: Option<i64> = conn
            .query_row(
                "SELECT seq FROM messages WHERE id = ?1",
                params![cursor],
                |row| row.get(0),
            )
            .optional()?;

        let messages = match (seq, self.options.unknown_cursor) {
            (Some(seq), _) => after(&conn, seq)?,
            (None, UnknownCursorPolicy::ReplayAll) => after(&conn, 0)?,
            (None, UnknownCursorPolicy::Reject) => {
                return Err(StoreError::UnknownCursor(cursor.to_owned()));
            }
        };
        Ok(cursor::into_page(messages, Some(cursor)))
    }

    fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
