//! Tool value objects: immutable result and error types
//!
//! Every tool invocation produces a [`ToolResult`]: success with output,
//! or failure with a coded [`ToolError`]. From the executor's point of
//! view an invocation is one atomic attempt; retries, if any, are the
//! tool's own business and invisible here.

use serde::{Deserialize, Serialize};

/// Error from a tool invocation.
///
/// Codes are stable strings consumed by traces and tests:
///
/// | Code | Meaning |
/// |------|---------|
/// | `UNKNOWN_ACTION_TYPE` | No registered tool handles the action |
/// | `INVALID_ARGUMENT` | Missing or malformed params |
/// | `NOT_FOUND` | A referenced resource does not exist |
/// | `EXECUTION_FAILED` | The tool ran and reported failure |
/// | `TIMEOUT` | The tool exceeded its time budget |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// The action's `tool` string matches no registered handler.
    pub fn unknown_action_type(tool: impl Into<String>) -> Self {
        Self::new(
            "UNKNOWN_ACTION_TYPE",
            format!("No registered tool handles action type '{}'", tool.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Resource not found: {}", resource.into()))
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new("TIMEOUT", format!("Operation timed out: {}", operation.into()))
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Structured metadata about one tool invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

/// Result of one tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that ran
    pub tool: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    pub fn success(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn failure(tool: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool: tool.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }
}
