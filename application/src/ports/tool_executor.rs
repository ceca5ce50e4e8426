//! Tool executor port
//!
//! How the plan executor reaches the tool registry. The registry is
//! external configuration: which tools exist is decided at wiring time,
//! not by the core.

use async_trait::async_trait;
use conclave_domain::plan::Action;
use conclave_domain::tool::ToolResult;

/// Port for executing planned actions against registered tools.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Whether a handler is registered for the action type.
    fn has_tool(&self, tool: &str) -> bool;

    /// Names of all registered tools.
    fn tool_names(&self) -> Vec<String>;

    /// Execute one action synchronously from the plan's point of view:
    /// one atomic attempt, success with output or failure with error.
    async fn execute(&self, action: &Action) -> ToolResult;
}
