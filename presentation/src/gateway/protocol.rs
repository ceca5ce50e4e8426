//! Gateway wire protocol
//!
//! One request message per task, exactly one terminal response. The
//! `error` field is present iff `status` denotes failure, so clients can
//! branch on either.

use conclave_domain::DomainError;
use conclave_domain::session::SessionMode;
use serde::{Deserialize, Serialize};

fn default_workspace() -> String {
    "default".to_string()
}

fn default_mode() -> String {
    "plan".to_string()
}

/// Inbound request frame.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayRequest {
    #[serde(default = "default_workspace")]
    pub workspace: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl GatewayRequest {
    /// Validate the request, yielding the parsed session mode.
    pub fn session_mode(&self) -> Result<SessionMode, String> {
        if self.text.trim().is_empty() {
            return Err("text must be non-empty".to_string());
        }
        self.mode.parse().map_err(|e: DomainError| e.to_string())
    }
}

/// Outbound terminal response frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox_id: Option<String>,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayResponse {
    /// Successful terminal response.
    pub fn done(inbox_id: i64, mode: &str, text: impl Into<String>) -> Self {
        Self {
            status: "done".to_string(),
            inbox_id: Some(inbox_id.to_string()),
            mode: mode.to_string(),
            text: Some(text.into()),
            error: None,
        }
    }

    /// Failed terminal response. `inbox_id` is absent when the request
    /// never made it into the inbox (e.g. invalid mode).
    pub fn failed(inbox_id: Option<i64>, mode: &str, error: impl Into<String>) -> Self {
        Self {
            status: "failed".to_string(),
            inbox_id: inbox_id.map(|id| id.to_string()),
            mode: mode.to_string(),
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}
