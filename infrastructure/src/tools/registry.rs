//! Tool registry
//!
//! Maps action `tool` strings to [`ToolHandler`] capabilities and
//! implements [`ToolExecutorPort`] for the plan executor. Registration
//! is wiring-time configuration: the executor never learns about tools
//! any other way.

use async_trait::async_trait;
use conclave_application::ports::tool_executor::ToolExecutorPort;
use conclave_domain::plan::Action;
use conclave_domain::tool::{ToolError, ToolHandler, ToolResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::command::CommandTool;
use super::scaffold::ScaffoldTool;
use super::tests_runner::TestsTool;

/// Registry of tool handlers, keyed by action type.
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The builtin set for a target repository: `run_command`,
    /// `run_tests`, `scaffold_nextjs`.
    pub fn builtin(repo_root: impl AsRef<Path>, command_timeout: Duration) -> Self {
        let root = repo_root.as_ref();
        Self::new()
            .register(CommandTool::new(root).with_timeout(command_timeout))
            .register(TestsTool::new(root))
            .register(ScaffoldTool::new(root))
    }

    /// Register a handler under its own name. Later registrations for
    /// the same name replace earlier ones.
    pub fn register<H: ToolHandler + 'static>(mut self, handler: H) -> Self {
        debug!(tool = handler.name(), "Registered tool");
        self.handlers.insert(handler.name().to_string(), Arc::new(handler));
        self
    }

    pub fn register_arc(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        debug!(tool = handler.name(), "Registered tool");
        self.handlers.insert(handler.name().to_string(), handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        match self.handlers.get(&action.tool) {
            Some(handler) => handler.execute(action).await,
            None => ToolResult::failure(
                &action.tool,
                ToolError::unknown_action_type(&action.tool),
            ),
        }
    }
}
