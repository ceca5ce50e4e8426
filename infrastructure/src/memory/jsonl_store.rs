//! JSONL-backed memory store
//!
//! One JSON object per line, append-only, with an RFC3339 timestamp on
//! every record. The summary handed to advisors is built from the most
//! recent entries: enough context to deliberate with, cheap enough to
//! read on every session start.

use async_trait::async_trait;
use conclave_application::ports::memory::{MemoryError, MemoryEvent, MemoryPort};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// How many recent events the summary carries.
const SUMMARY_RECENT: usize = 10;

/// One persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemoryRecord {
    timestamp: String,
    content: String,
    #[serde(rename = "type")]
    kind: String,
    importance: u8,
}

/// Append-only JSONL store implementing [`MemoryPort`].
///
/// Thread-safe via a mutex around the append path; reads open the file
/// independently so a reader never blocks a writer.
pub struct JsonlMemoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlMemoryStore {
    /// Create a store at the given path, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            return Err(MemoryError::Unavailable(format!(
                "Could not create memory directory {}: {}",
                parent.display(),
                e
            )));
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Vec<MemoryRecord> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            // Missing file just means nothing has been remembered yet.
            Err(_) => return Vec::new(),
        };

        BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<MemoryRecord>(&line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupt memory record");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl MemoryPort for JsonlMemoryStore {
    async fn read_summary(&self) -> Result<String, MemoryError> {
        let records = self.read_records();
        let recent: Vec<&MemoryRecord> = records.iter().rev().take(SUMMARY_RECENT).collect();

        let summary = serde_json::json!({
            "event_count": records.len(),
            "recent": recent.iter().rev().map(|r| serde_json::json!({
                "content": r.content,
                "type": r.kind,
                "importance": r.importance,
            })).collect::<Vec<_>>(),
        });
        Ok(summary.to_string())
    }

    async fn write_event(&self, event: MemoryEvent) -> Result<(), MemoryError> {
        let record = MemoryRecord {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            content: event.content,
            kind: event.kind.as_str().to_string(),
            importance: event.importance,
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| MemoryError::WriteFailed(e.to_string()))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| MemoryError::WriteFailed("memory store lock poisoned".into()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MemoryError::Unavailable(e.to_string()))?;
        writeln!(file, "{}", line).map_err(|e| MemoryError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_application::ports::memory::MemoryEventKind;

    fn store_in(dir: &tempfile::TempDir) -> JsonlMemoryStore {
        JsonlMemoryStore::new(dir.path().join("memory.jsonl")).unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let summary = store.read_summary().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(value["event_count"], 0);
        assert!(value["recent"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .write_event(MemoryEvent::new("likes terse output", MemoryEventKind::Preference, 4))
            .await
            .unwrap();
        store
            .write_event(MemoryEvent::session_outcome("conclave completed task: x"))
            .await
            .unwrap();

        let summary = store.read_summary().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(value["event_count"], 2);
        let recent = value["recent"].as_array().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["type"], "preference");
        assert_eq!(recent[1]["type"], "event");
        assert_eq!(recent[1]["importance"], 6);
    }

    #[tokio::test]
    async fn test_summary_caps_recent_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for i in 0..15 {
            store
                .write_event(MemoryEvent::new(format!("event {}", i), MemoryEventKind::Event, 1))
                .await
                .unwrap();
        }

        let value: serde_json::Value =
            serde_json::from_str(&store.read_summary().await.unwrap()).unwrap();
        assert_eq!(value["event_count"], 15);
        let recent = value["recent"].as_array().unwrap();
        assert_eq!(recent.len(), SUMMARY_RECENT);
        // Oldest of the recent window first, newest last
        assert_eq!(recent[0]["content"], "event 5");
        assert_eq!(recent[9]["content"], "event 14");
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        std::fs::write(&path, "not json\n").unwrap();

        let store = JsonlMemoryStore::new(&path).unwrap();
        store
            .write_event(MemoryEvent::new("good", MemoryEventKind::Fact, 2))
            .await
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&store.read_summary().await.unwrap()).unwrap();
        assert_eq!(value["event_count"], 1);
    }

    #[tokio::test]
    async fn test_records_carry_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .write_event(MemoryEvent::new("stamped", MemoryEventKind::Insight, 3))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let record: serde_json::Value = serde_json::from_str(raw.trim()).unwrap();
        assert!(record.get("timestamp").is_some());
        assert_eq!(record["type"], "insight");
    }
}
