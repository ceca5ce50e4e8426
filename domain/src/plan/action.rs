//! Planned actions
//!
//! An [`Action`] is one unit of planned work addressed to a named tool.
//! Params use a `BTreeMap` so that serialized plans are byte-stable:
//! repeated deliberations over the same inputs must produce identical
//! plan bytes.

use crate::advisor::AdvisorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of planned work, immutable once created.
///
/// Two actions are duplicates when their `tool` and `params` are equal;
/// `label` and `origin` are audit metadata and excluded from identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Registry key of the tool that handles this action
    pub tool: String,
    /// Human-readable description for plan display
    pub label: String,
    /// Tool arguments: string keys to scalar values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
    /// Which advisor proposed this action, for tie-breaking and audit
    pub origin: AdvisorId,
}

impl Action {
    pub fn new(origin: AdvisorId, tool: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            label: label.into(),
            params: BTreeMap::new(),
            origin,
        }
    }

    /// Shorthand for a `run_command` action, the most common kind.
    pub fn command(
        origin: AdvisorId,
        label: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self::new(origin, "run_command", label).with_param("command", command.into())
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a string param.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string param or an error message naming it.
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required param '{}' for tool '{}'", key, self.tool))
    }

    /// Get an optional i64 param.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(|v| v.as_i64())
    }

    /// Duplicate-detection key: tool name plus params, serialized.
    ///
    /// `BTreeMap` ordering makes this deterministic, so equal
    /// `(tool, params)` pairs always collide.
    pub fn dedup_key(&self) -> String {
        let params = serde_json::to_string(&self.params).unwrap_or_default();
        format!("{}\u{1}{}", self.tool, params)
    }
}
