//! Infrastructure layer for conclave
//!
//! Adapters for the application's ports: the builtin tool registry, the
//! JSONL memory store, the script preflight hook, the SQLite inbox
//! store, and the configuration loader.

pub mod config;
pub mod inbox;
pub mod memory;
pub mod preflight;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use inbox::SqliteInboxStore;
pub use memory::JsonlMemoryStore;
pub use preflight::ScriptPreflight;
pub use tools::{CommandTool, ScaffoldTool, TestsTool, ToolRegistry};
