//! Persistent-memory port
//!
//! The core reads one summary at session start and writes exactly one
//! structured outcome event at session end. Everything else about the
//! memory store (format, search, retention) is the adapter's problem.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a memory event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryEventKind {
    Fact,
    Preference,
    Event,
    Insight,
    Task,
    Relationship,
}

impl MemoryEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryEventKind::Fact => "fact",
            MemoryEventKind::Preference => "preference",
            MemoryEventKind::Event => "event",
            MemoryEventKind::Insight => "insight",
            MemoryEventKind::Task => "task",
            MemoryEventKind::Relationship => "relationship",
        }
    }
}

impl std::fmt::Display for MemoryEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One event to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub content: String,
    pub kind: MemoryEventKind,
    /// 1..=10 in the reference deployment; session outcomes use 6
    pub importance: u8,
}

impl MemoryEvent {
    pub fn new(content: impl Into<String>, kind: MemoryEventKind, importance: u8) -> Self {
        Self {
            content: content.into(),
            kind,
            importance,
        }
    }

    /// A session-outcome event at the importance the audit trail uses.
    pub fn session_outcome(content: impl Into<String>) -> Self {
        Self::new(content, MemoryEventKind::Event, 6)
    }
}

/// Errors from the memory collaborator.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Memory store unavailable: {0}")]
    Unavailable(String),

    #[error("Memory write failed: {0}")]
    WriteFailed(String),
}

/// Port for the external persistent-memory collaborator.
///
/// `read_summary` is best-effort: callers degrade to an empty summary on
/// failure. `write_event` is the audit trail; its loss is the one
/// unacceptable failure, so callers retry it and surface a final
/// failure loudly.
#[async_trait]
pub trait MemoryPort: Send + Sync {
    /// Fetch a read-only summary of what the store knows.
    async fn read_summary(&self) -> Result<String, MemoryError>;

    /// Append one event.
    async fn write_event(&self, event: MemoryEvent) -> Result<(), MemoryError>;
}

/// In-memory no-op store for tests and degraded operation.
#[derive(Default)]
pub struct NoMemory;

#[async_trait]
impl MemoryPort for NoMemory {
    async fn read_summary(&self) -> Result<String, MemoryError> {
        Ok(String::new())
    }

    async fn write_event(&self, _event: MemoryEvent) -> Result<(), MemoryError> {
        Ok(())
    }
}
