//! Votes and proposals
//!
//! A [`Proposal`] is the complete output of one advisor for one task:
//! a [`Vote`], a free-text rationale, and the actions the advisor wants
//! in the plan. The rationale is audit-only and is never parsed for
//! control flow.

use super::identity::AdvisorId;
use crate::plan::Action;
use serde::{Deserialize, Serialize};

/// A single advisor's vote on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Advisor endorses the task and may contribute actions
    Approve,
    /// Advisor opposes the task; its actions are ignored
    Reject,
    /// Advisor takes no position; its actions are ignored
    Abstain,
    /// Advisor unconditionally blocks the plan, regardless of other votes
    Veto,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Approve => "approve",
            Vote::Reject => "reject",
            Vote::Abstain => "abstain",
            Vote::Veto => "veto",
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, Vote::Approve)
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, Vote::Veto)
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a proposal failed structural validation.
///
/// A defective proposal is not an error that aborts deliberation: the
/// coordinator downgrades it to an abstention and records the defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalDefect {
    /// A veto must not carry actions; the veto is the whole statement
    VetoWithActions,
    /// The proposal claims an advisor other than the roster slot it came from
    WrongAdvisor { expected: AdvisorId, found: AdvisorId },
}

impl std::fmt::Display for ProposalDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalDefect::VetoWithActions => {
                write!(f, "veto proposal carries actions")
            }
            ProposalDefect::WrongAdvisor { expected, found } => {
                write!(f, "proposal from {} claims identity {}", expected, found)
            }
        }
    }
}

/// Output of one advisor for one task.
///
/// # Example
///
/// ```
/// use conclave_domain::advisor::{AdvisorId, Proposal, Vote};
/// use conclave_domain::plan::Action;
///
/// let p = Proposal::approve(AdvisorId::Logic, "inspect before changing")
///     .with_action(Action::command(AdvisorId::Logic, "Inspect repository", "git status --short"));
/// assert_eq!(p.vote, Vote::Approve);
/// assert_eq!(p.actions.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Which roster member produced this proposal
    pub advisor: AdvisorId,
    /// The advisor's position on the task
    pub vote: Vote,
    /// Free text for audit; never drives control flow
    pub rationale: String,
    /// Candidate actions, in the advisor's intended order
    pub actions: Vec<Action>,
    /// Residual risks the advisor wants on record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,
    /// What would have to change for a vetoing advisor to stand down
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unblock_requirements: Vec<String>,
}

impl Proposal {
    pub fn new(advisor: AdvisorId, vote: Vote, rationale: impl Into<String>) -> Self {
        Self {
            advisor,
            vote,
            rationale: rationale.into(),
            actions: Vec::new(),
            risks: Vec::new(),
            unblock_requirements: Vec::new(),
        }
    }

    /// An approving proposal.
    pub fn approve(advisor: AdvisorId, rationale: impl Into<String>) -> Self {
        Self::new(advisor, Vote::Approve, rationale)
    }

    /// A rejecting proposal.
    pub fn reject(advisor: AdvisorId, rationale: impl Into<String>) -> Self {
        Self::new(advisor, Vote::Reject, rationale)
    }

    /// An abstention.
    pub fn abstain(advisor: AdvisorId, rationale: impl Into<String>) -> Self {
        Self::new(advisor, Vote::Abstain, rationale)
    }

    /// A veto. Vetoes carry no actions.
    pub fn veto(advisor: AdvisorId, rationale: impl Into<String>) -> Self {
        Self::new(advisor, Vote::Veto, rationale)
    }

    /// The abstention substituted for a failed or malformed advisor.
    ///
    /// The defect description ends up in the rationale so the audit
    /// trail shows what actually happened.
    pub fn degraded(advisor: AdvisorId, defect: impl std::fmt::Display) -> Self {
        Self::abstain(advisor, format!("advisor degraded to abstain: {}", defect))
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risks.push(risk.into());
        self
    }

    pub fn with_unblock_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.unblock_requirements.push(requirement.into());
        self
    }

    /// Structural validation against an expected roster slot.
    pub fn validate(&self, expected: AdvisorId) -> Result<(), ProposalDefect> {
        if self.advisor != expected {
            return Err(ProposalDefect::WrongAdvisor {
                expected,
                found: self.advisor,
            });
        }
        if self.vote.is_veto() && !self.actions.is_empty() {
            return Err(ProposalDefect::VetoWithActions);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Action;

    #[test]
    fn test_vote_display() {
        assert_eq!(Vote::Approve.to_string(), "approve");
        assert_eq!(Vote::Veto.to_string(), "veto");
    }

    #[test]
    fn test_veto_with_actions_is_defective() {
        let p = Proposal::veto(AdvisorId::Safeguard, "danger").with_action(Action::command(
            AdvisorId::Safeguard,
            "sneaky",
            "echo hi",
        ));
        assert_eq!(
            p.validate(AdvisorId::Safeguard),
            Err(ProposalDefect::VetoWithActions)
        );
    }

    #[test]
    fn test_wrong_advisor_is_defective() {
        let p = Proposal::approve(AdvisorId::Logic, "fine");
        assert!(matches!(
            p.validate(AdvisorId::Pragmatic),
            Err(ProposalDefect::WrongAdvisor { .. })
        ));
    }

    #[test]
    fn test_valid_proposal() {
        let p = Proposal::approve(AdvisorId::Logic, "fine")
            .with_action(Action::command(AdvisorId::Logic, "A", "echo a"))
            .with_risk("scope creep");
        assert!(p.validate(AdvisorId::Logic).is_ok());
        assert_eq!(p.risks.len(), 1);
    }

    #[test]
    fn test_degraded_records_defect() {
        let p = Proposal::degraded(AdvisorId::Efficiency, "advisor panicked");
        assert_eq!(p.vote, Vote::Abstain);
        assert!(p.actions.is_empty());
        assert!(p.rationale.contains("advisor panicked"));
    }
}
