//! Configuration file schema
//!
//! All sections are optional in the file; missing values fall back to
//! these defaults. Paths are resolved relative to the target repository
//! unless absolute.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub quorum: QuorumConfig,
    pub memory: MemoryConfig,
    pub tools: ToolsConfig,
    pub gateway: GatewayConfig,
    pub preflight: PreflightConfig,
}

/// `[quorum]` section: how many approvals unblock a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumConfig {
    /// `majority` (default), `unanimous`, or `atleast:N`
    pub rule: String,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
        }
    }
}

/// `[memory]` section: where the JSONL memory store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Relative to the target repository unless absolute
    pub path: PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".conclave/memory.jsonl"),
        }
    }
}

/// `[tools]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Timeout for a single shell command, in seconds
    pub command_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 60,
        }
    }
}

/// `[gateway]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address for the realtime gateway
    pub bind: String,
    /// Inbox database, relative to the target repository unless absolute
    pub inbox_path: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            inbox_path: PathBuf::from(".conclave/inbox.db"),
        }
    }
}

/// `[preflight]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    pub enabled: bool,
    /// Startup script, relative to the target repository
    pub script: PathBuf,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script: PathBuf::from("scripts/start.sh"),
        }
    }
}
