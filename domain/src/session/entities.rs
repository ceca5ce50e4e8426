//! Session entities
//!
//! A [`Task`] is the immutable input of one invocation; a
//! [`SessionOutcome`] is everything the invocation produced. The
//! controller owns both for the lifetime of a single run; nothing here
//! survives across invocations.

use crate::core::DomainError;
use crate::plan::{ExecutionTrace, Plan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a session stops after planning or carries the plan out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Deliberate and merge, print the plan, execute nothing
    Plan,
    /// Deliberate, merge, and execute
    #[default]
    Exec,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Plan => "plan",
            SessionMode::Exec => "exec",
        }
    }

    pub fn is_plan_only(&self) -> bool {
        matches!(self, SessionMode::Plan)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan" => Ok(SessionMode::Plan),
            "exec" => Ok(SessionMode::Exec),
            other => Err(DomainError::InvalidMode(other.to_string())),
        }
    }
}

/// Immutable input of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// The free-text request
    pub text: String,
    /// Repository the tools operate on
    pub repo_root: PathBuf,
    pub mode: SessionMode,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            repo_root: PathBuf::from("."),
            mode: SessionMode::default(),
        }
    }

    pub fn with_repo_root(mut self, repo_root: impl Into<PathBuf>) -> Self {
        self.repo_root = repo_root.into();
        self
    }

    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Case-insensitive containment check used by the heuristic advisors.
    pub fn mentions(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// The controller's position in one invocation's lifecycle.
///
/// Transitions are strictly forward:
/// `Init → Preflight → MemoryLoaded → Deliberated → Merged →
/// {PlanOnlyDone | Executed} → Logged`. `Logged` is terminal and is
/// reached exactly once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Init,
    Preflight,
    MemoryLoaded,
    Deliberated,
    Merged,
    PlanOnlyDone,
    Executed,
    Logged,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Init => "init",
            SessionPhase::Preflight => "preflight",
            SessionPhase::MemoryLoaded => "memory_loaded",
            SessionPhase::Deliberated => "deliberated",
            SessionPhase::Merged => "merged",
            SessionPhase::PlanOnlyDone => "plan_only_done",
            SessionPhase::Executed => "executed",
            SessionPhase::Logged => "logged",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal status of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Plan produced (and executed fully, in exec mode)
    Completed,
    /// Merge blocked the plan; a valid deterministic outcome, not a crash
    Blocked,
    /// Execution halted on a failed step
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Completed => "completed",
            SessionStatus::Blocked => "blocked",
            SessionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything one invocation produced, handed to the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub task: Task,
    pub plan: Plan,
    /// Present only when the plan was executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ExecutionTrace>,
    pub status: SessionStatus,
}

impl SessionOutcome {
    /// Outcome of a blocked merge.
    pub fn blocked(task: Task, plan: Plan) -> Self {
        Self {
            task,
            plan,
            trace: None,
            status: SessionStatus::Blocked,
        }
    }

    /// Outcome of a plan-only run.
    pub fn plan_only(task: Task, plan: Plan) -> Self {
        Self {
            task,
            plan,
            trace: None,
            status: SessionStatus::Completed,
        }
    }

    /// Outcome of an executed run; status follows the trace.
    pub fn executed(task: Task, plan: Plan, trace: ExecutionTrace) -> Self {
        let status = if trace.succeeded() {
            SessionStatus::Completed
        } else {
            SessionStatus::Failed
        };
        Self {
            task,
            plan,
            trace: Some(trace),
            status,
        }
    }

    /// One-line audit summary in the style the memory log expects.
    pub fn audit_summary(&self) -> String {
        match self.status {
            SessionStatus::Blocked => format!("conclave blocked task: {}", self.task.text),
            SessionStatus::Failed => format!("conclave task failed: {}", self.task.text),
            SessionStatus::Completed => format!("conclave completed task: {}", self.task.text),
        }
    }
}
