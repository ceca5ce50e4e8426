//! App scaffolding tool: scaffold_nextjs
//!
//! Creates an `apps/` directory under the repository and runs
//! `create-next-app` inside it. The heavy lifting is delegated to the
//! shell tool; this handler only prepares the directory and the command.

use async_trait::async_trait;
use conclave_domain::plan::Action;
use conclave_domain::tool::{ToolError, ToolHandler, ToolResult};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use super::command::CommandTool;

/// Tool name constant
pub const SCAFFOLD_NEXTJS: &str = "scaffold_nextjs";

/// Scaffolding downloads packages; allow it several minutes.
const SCAFFOLD_TIMEOUT_SECS: u64 = 600;

/// Handler for `scaffold_nextjs` actions.
pub struct ScaffoldTool {
    repo_root: PathBuf,
}

impl ScaffoldTool {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Validate the app name and make sure `apps/` exists.
    fn prepare(&self, app_name: &str) -> Result<PathBuf, ToolError> {
        if app_name.is_empty() || app_name.contains(['/', ' ']) {
            return Err(ToolError::invalid_argument(format!(
                "Invalid app_name: '{}'",
                app_name
            )));
        }
        let apps_dir = self.repo_root.join("apps");
        std::fs::create_dir_all(&apps_dir).map_err(|e| {
            ToolError::execution_failed(format!("Could not create {}: {}", apps_dir.display(), e))
        })?;
        Ok(apps_dir)
    }
}

#[async_trait]
impl ToolHandler for ScaffoldTool {
    fn name(&self) -> &str {
        SCAFFOLD_NEXTJS
    }

    fn description(&self) -> &str {
        "Scaffold a Next.js application under apps/."
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        let app_name = action.get_string("app_name").unwrap_or("conclave-app");
        let apps_dir = match self.prepare(app_name) {
            Ok(dir) => dir,
            Err(e) => return ToolResult::failure(SCAFFOLD_NEXTJS, e),
        };

        debug!(app_name, dir = %apps_dir.display(), "Scaffolding Next.js app");

        let runner =
            CommandTool::new(&apps_dir).with_timeout(Duration::from_secs(SCAFFOLD_TIMEOUT_SECS));
        let inner = Action::command(
            action.origin,
            "Scaffold Next.js app",
            format!("npx create-next-app@latest {} --yes", app_name),
        );
        let result = runner.execute(&inner).await;

        ToolResult {
            tool: SCAFFOLD_NEXTJS.to_string(),
            ..result
        }
    }
}
