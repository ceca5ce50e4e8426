//! Execution traces
//!
//! A [`StepResult`] records what happened to one planned action; the
//! ordered sequence is the [`ExecutionTrace`], the session's auditable
//! outcome. Traces always cover the full intended plan: steps the
//! executor never reached are recorded as skipped, not dropped.

use super::action::Action;
use crate::tool::ToolError;
use serde::{Deserialize, Serialize};

/// Outcome of one executed (or skipped) step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Tool ran and reported success
    Ok,
    /// Tool failed, or the action's tool was not registered
    Failed,
    /// Never attempted because an earlier step failed
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Ok => "ok",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of executing one [`Action`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// The planned action this step executed
    pub action: Action,
    pub status: StepStatus,
    /// Tool output, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Present iff status is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl StepResult {
    pub fn ok(action: Action, output: impl Into<String>) -> Self {
        Self {
            action,
            status: StepStatus::Ok,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failed(action: Action, error: ToolError) -> Self {
        Self {
            action,
            status: StepStatus::Failed,
            output: None,
            error: Some(error),
        }
    }

    pub fn skipped(action: Action) -> Self {
        Self {
            action,
            status: StepStatus::Skipped,
            output: None,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StepStatus::Ok
    }
}

/// Ordered record of outcomes from executing a plan, immutable after
/// creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub steps: Vec<StepResult>,
}

impl ExecutionTrace {
    pub fn new(steps: Vec<StepResult>) -> Self {
        Self { steps }
    }

    /// True when every step ran and succeeded.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(StepResult::is_ok)
    }

    /// Count of steps per status: (ok, failed, skipped).
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for step in &self.steps {
            match step.status {
                StepStatus::Ok => counts.0 += 1,
                StepStatus::Failed => counts.1 += 1,
                StepStatus::Skipped => counts.2 += 1,
            }
        }
        counts
    }

    /// The first failing step, if any.
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// One-line summary for the audit log, e.g. `3 ok, 1 failed, 2 skipped`.
    pub fn summary(&self) -> String {
        let (ok, failed, skipped) = self.counts();
        format!("{} ok, {} failed, {} skipped", ok, failed, skipped)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
