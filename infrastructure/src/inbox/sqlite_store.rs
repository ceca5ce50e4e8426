//! SQLite-backed inbox store
//!
//! Every gateway request leaves a row in `inbox_messages`, updated as
//! the request moves from pending through running to done or failed.
//! The table survives restarts so operators can audit what the gateway
//! was asked to do.

use async_trait::async_trait;
use conclave_application::ports::inbox::{InboxError, InboxPort, InboxRecord, InboxStatus};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Inbox store over a single SQLite database file.
///
/// rusqlite connections are not `Sync`; a mutex serializes access,
/// which is plenty for the gateway's request volume.
pub struct SqliteInboxStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteInboxStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InboxError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            return Err(InboxError::Unavailable(format!(
                "Could not create inbox directory {}: {}",
                parent.display(),
                e
            )));
        }

        let conn = Connection::open(&path)
            .map_err(|e| InboxError::Unavailable(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Open an in-memory database (tests).
    pub fn in_memory() -> Result<Self, InboxError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| InboxError::Unavailable(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, InboxError> {
        self.conn
            .lock()
            .map_err(|_| InboxError::Unavailable("inbox connection lock poisoned".into()))
    }
}

fn init_schema(conn: &Connection) -> Result<(), InboxError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS inbox_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT,
            workspace TEXT,
            channel TEXT,
            mode TEXT,
            status TEXT,
            user_text TEXT,
            response_text TEXT NULL,
            error_text TEXT NULL
        )",
        [],
    )
    .map_err(|e| InboxError::Unavailable(e.to_string()))?;
    Ok(())
}

fn parse_status(s: &str) -> InboxStatus {
    match s {
        "pending" => InboxStatus::Pending,
        "running" => InboxStatus::Running,
        "done" => InboxStatus::Done,
        _ => InboxStatus::Failed,
    }
}

#[async_trait]
impl InboxPort for SqliteInboxStore {
    async fn insert_pending(
        &self,
        workspace: &str,
        channel: &str,
        mode: &str,
        user_text: &str,
    ) -> Result<i64, InboxError> {
        let conn = self.lock()?;
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO inbox_messages (created_at, workspace, channel, mode, status, user_text)
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
            params![created_at, workspace, channel, mode, user_text],
        )
        .map_err(|e| InboxError::QueryFailed(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    async fn set_status(
        &self,
        id: i64,
        status: InboxStatus,
        response_text: Option<&str>,
        error_text: Option<&str>,
    ) -> Result<(), InboxError> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE inbox_messages
             SET status = ?1, response_text = ?2, error_text = ?3
             WHERE id = ?4",
            params![status.as_str(), response_text, error_text, id],
        )
        .map_err(|e| InboxError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<InboxRecord>, InboxError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, created_at, workspace, channel, mode, status, user_text,
                    response_text, error_text
             FROM inbox_messages WHERE id = ?1",
            params![id],
            |row| {
                Ok(InboxRecord {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    workspace: row.get(2)?,
                    channel: row.get(3)?,
                    mode: row.get(4)?,
                    status: parse_status(&row.get::<_, String>(5)?),
                    user_text: row.get(6)?,
                    response_text: row.get(7)?,
                    error_text: row.get(8)?,
                })
            },
        )
        .optional()
        .map_err(|e| InboxError::QueryFailed(e.to_string()))
    }
}
