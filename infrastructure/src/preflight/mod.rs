//! Preflight adapter
//!
//! Runs the repository's startup script when one exists. The hook is
//! best-effort by contract: the caller logs a failure and moves on.

use async_trait::async_trait;
use conclave_application::ports::preflight::{PreflightError, PreflightPort};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Relative path of the startup script inside the target repo.
const DEFAULT_SCRIPT: &str = "scripts/start.sh";

/// Preflight hook that runs `scripts/start.sh` if present.
pub struct ScriptPreflight {
    script: PathBuf,
    enabled: bool,
}

impl ScriptPreflight {
    pub fn new() -> Self {
        Self {
            script: PathBuf::from(DEFAULT_SCRIPT),
            enabled: true,
        }
    }

    /// Override the script path (relative to the repo root).
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }

    /// Turn the hook off entirely (config `preflight.enabled = false`).
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for ScriptPreflight {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreflightPort for ScriptPreflight {
    async fn run(&self, repo_root: &Path) -> Result<(), PreflightError> {
        if !self.enabled {
            debug!("Preflight disabled by configuration");
            return Ok(());
        }
        let script = repo_root.join(&self.script);
        if !script.is_file() {
            debug!(script = %script.display(), "No preflight script; skipping");
            return Ok(());
        }

        info!(script = %script.display(), "Running preflight script");
        let repo_root = repo_root.to_path_buf();
        let status = tokio::task::spawn_blocking(move || {
            Command::new("bash")
                .arg(&script)
                .current_dir(&repo_root)
                .status()
        })
        .await
        .map_err(|e| PreflightError::HookFailed(format!("preflight task failed: {}", e)))?
        .map_err(|e| PreflightError::HookFailed(format!("could not run script: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(PreflightError::HookFailed(format!(
                "script exited with {}",
                status.code().unwrap_or(-1)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_script_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let preflight = ScriptPreflight::new();
        assert!(preflight.run(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_successful_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("scripts")).unwrap();
        std::fs::write(dir.path().join("scripts/start.sh"), "exit 0\n").unwrap();

        let preflight = ScriptPreflight::new();
        assert!(preflight.run(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_script_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("scripts")).unwrap();
        std::fs::write(dir.path().join("scripts/start.sh"), "exit 7\n").unwrap();

        let preflight = ScriptPreflight::new();
        let err = preflight.run(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("7"));
    }

    #[tokio::test]
    async fn test_custom_script_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("boot.sh"), "exit 0\n").unwrap();

        let preflight = ScriptPreflight::new().with_script("boot.sh");
        assert!(preflight.run(dir.path()).await.is_ok());
    }
}
