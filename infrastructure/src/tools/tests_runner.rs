//! Test-runner tool: run_tests
//!
//! Detects the project type in the target repository and runs its test
//! command. Detection order matters: a polyglot repo with a
//! `package.json` at the root is treated as a Node project.

use async_trait::async_trait;
use conclave_domain::plan::Action;
use conclave_domain::tool::{ToolHandler, ToolResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::command::CommandTool;

/// Tool name constant
pub const RUN_TESTS: &str = "run_tests";

/// Test suites can be slow; give them more room than plain commands.
const TEST_TIMEOUT_SECS: u64 = 600;

/// Handler for `run_tests` actions.
pub struct TestsTool {
    repo_root: PathBuf,
}

impl TestsTool {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Pick the test command for the repository, if any.
    fn detect(root: &Path) -> Option<&'static str> {
        if root.join("package.json").is_file() {
            return Some("npm test");
        }
        if root.join("Cargo.toml").is_file() {
            return Some("cargo test");
        }
        if has_ext(root, "csproj") || has_ext(root, "sln") {
            return Some("dotnet test");
        }
        if root.join("tests").is_dir() {
            return Some("python -m unittest");
        }
        None
    }
}

fn has_ext(root: &Path, ext: &str) -> bool {
    std::fs::read_dir(root)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|x| x == ext))
        })
        .unwrap_or(false)
}

#[async_trait]
impl ToolHandler for TestsTool {
    fn name(&self) -> &str {
        RUN_TESTS
    }

    fn description(&self) -> &str {
        "Detect the project type and run its test suite."
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        let Some(command) = Self::detect(&self.repo_root) else {
            return ToolResult::success(RUN_TESTS, "No tests detected");
        };
        debug!(command, "Detected test command");

        let runner = CommandTool::new(&self.repo_root)
            .with_timeout(Duration::from_secs(TEST_TIMEOUT_SECS));
        let inner = Action::command(action.origin, "Run project tests", command);
        let result = runner.execute(&inner).await;

        // Re-badge the result under this tool's name for the trace.
        ToolResult {
            tool: RUN_TESTS.to_string(),
            ..result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::advisor::AdvisorId;

    #[test]
    fn test_detect_node_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        assert_eq!(TestsTool::detect(dir.path()), Some("npm test"));
    }

    #[test]
    fn test_detect_cargo_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        assert_eq!(TestsTool::detect(dir.path()), Some("cargo test"));
    }

    #[test]
    fn test_detect_dotnet_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.csproj"), "<Project/>").unwrap();
        assert_eq!(TestsTool::detect(dir.path()), Some("dotnet test"));
    }

    #[test]
    fn test_detect_python_tests_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tests")).unwrap();
        assert_eq!(TestsTool::detect(dir.path()), Some("python -m unittest"));
    }

    #[test]
    fn test_node_takes_priority_over_tests_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("tests")).unwrap();
        assert_eq!(TestsTool::detect(dir.path()), Some("npm test"));
    }

    #[tokio::test]
    async fn test_no_project_detected_is_noop_success() {
        let dir = tempfile::tempdir().unwrap();
        let tool = TestsTool::new(dir.path());
        let action = Action::new(AdvisorId::Logic, RUN_TESTS, "Run project tests");

        let result = tool.execute(&action).await;
        assert!(result.is_success());
        assert_eq!(result.output(), Some("No tests detected"));
    }
}
