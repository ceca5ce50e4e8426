//! Preflight port
//!
//! A no-argument, best-effort startup hook invoked once before memory
//! load. Failure is logged by the caller and never fatal.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from the preflight collaborator.
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("Preflight hook failed: {0}")]
    HookFailed(String),
}

/// Port for the external startup collaborator.
#[async_trait]
pub trait PreflightPort: Send + Sync {
    /// Run the startup hook against the target repository.
    async fn run(&self, repo_root: &Path) -> Result<(), PreflightError>;
}

/// No-op preflight for tests and deployments without a startup hook.
#[derive(Default)]
pub struct NoPreflight;

#[async_trait]
impl PreflightPort for NoPreflight {
    async fn run(&self, _repo_root: &Path) -> Result<(), PreflightError> {
        Ok(())
    }
}
