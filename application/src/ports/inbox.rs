//! Inbox port
//!
//! The realtime gateway records every request it serves: pending when
//! received, running when a session starts, done or failed when the
//! terminal response goes out. The store behind it is adapter-defined.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of one inbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboxStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl InboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboxStatus::Pending => "pending",
            InboxStatus::Running => "running",
            InboxStatus::Done => "done",
            InboxStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for InboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored inbox message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxRecord {
    pub id: i64,
    pub created_at: String,
    pub workspace: String,
    pub channel: String,
    pub mode: String,
    pub status: InboxStatus,
    pub user_text: String,
    pub response_text: Option<String>,
    pub error_text: Option<String>,
}

/// Errors from the inbox store.
#[derive(Error, Debug)]
pub enum InboxError {
    #[error("Inbox store unavailable: {0}")]
    Unavailable(String),

    #[error("Inbox query failed: {0}")]
    QueryFailed(String),
}

/// Port for the gateway's request inbox.
#[async_trait]
pub trait InboxPort: Send + Sync {
    /// Insert a new message in `Pending` status, returning its id.
    async fn insert_pending(
        &self,
        workspace: &str,
        channel: &str,
        mode: &str,
        user_text: &str,
    ) -> Result<i64, InboxError>;

    /// Update a message's status and terminal texts.
    async fn set_status(
        &self,
        id: i64,
        status: InboxStatus,
        response_text: Option<&str>,
        error_text: Option<&str>,
    ) -> Result<(), InboxError>;

    /// Fetch a message by id.
    async fn get(&self, id: i64) -> Result<Option<InboxRecord>, InboxError>;
}
