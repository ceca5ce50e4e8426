//! The merged plan

use super::action::Action;
use serde::{Deserialize, Serialize};

/// The single, deduplicated, ordered action sequence produced by merging
/// proposals, or a blocked marker explaining why nothing will run.
///
/// A blocked plan always has an empty action sequence and must never be
/// handed to the executor. Plans are created fresh per task and are not
/// persisted; only the resulting trace is logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Ordered, deduplicated actions; empty when blocked
    pub actions: Vec<Action>,
    /// Whether execution is blocked
    pub blocked: bool,
    /// Machine-readable reason, present iff blocked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_reason: Option<String>,
    /// What the vetoing advisor(s) would need to stand down
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unblock_requirements: Vec<String>,
}

impl Plan {
    /// An executable plan with the given actions.
    pub fn ready(actions: Vec<Action>) -> Self {
        Self {
            actions,
            blocked: false,
            blocking_reason: None,
            unblock_requirements: Vec::new(),
        }
    }

    /// A blocked plan. Carries no actions by construction.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            actions: Vec::new(),
            blocked: true,
            blocking_reason: Some(reason.into()),
            unblock_requirements: Vec::new(),
        }
    }

    pub fn with_unblock_requirements(
        mut self,
        requirements: impl IntoIterator<Item = String>,
    ) -> Self {
        self.unblock_requirements.extend(requirements);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
