//! The reference advisor roster
//!
//! Five deterministic, side-effect-free perspectives. Each maps a
//! `(task, memory_summary)` pair to exactly one [`Proposal`]; the same
//! inputs always yield the same proposal, which is what makes plan-only
//! runs reproducible and auditable.
//!
//! Advisors never touch tools or memory. Side effects belong to the
//! plan executor alone.

use super::identity::AdvisorId;
use super::proposal::Proposal;
use crate::plan::Action;
use crate::session::Task;
use std::sync::Arc;

/// One perspective in deliberation: a pure function from task and
/// memory summary to a proposal.
///
/// Implementations must be deterministic and free of side effects for
/// any given input pair. An implementation that panics is degraded to an
/// abstention by the deliberation coordinator; it cannot abort a run.
pub trait Advisor: Send + Sync {
    /// Which roster slot this advisor fills.
    fn id(&self) -> AdvisorId;

    /// Produce this advisor's proposal for the task.
    fn propose(&self, task: &Task, memory_summary: &str) -> Proposal;
}

/// The fixed reference roster, in deliberation order.
pub fn standard_roster() -> Vec<Arc<dyn Advisor>> {
    vec![
        Arc::new(LogicAdvisor),
        Arc::new(PragmaticAdvisor),
        Arc::new(SafeguardAdvisor),
        Arc::new(EfficiencyAdvisor),
        Arc::new(HumanImpactAdvisor),
    ]
}

/// Breaks the request into deterministic inspect/build/verify steps.
pub struct LogicAdvisor;

impl Advisor for LogicAdvisor {
    fn id(&self) -> AdvisorId {
        AdvisorId::Logic
    }

    fn propose(&self, task: &Task, _memory_summary: &str) -> Proposal {
        let mut actions = vec![
            Action::command(self.id(), "Inspect repository", "git status --short"),
            Action::command(self.id(), "Locate relevant files", "rg --files"),
        ];
        if task.mentions("test") || task.mentions("verify") {
            actions.push(Action::new(self.id(), "run_tests", "Run project tests"));
        }
        Proposal::approve(
            self.id(),
            "Break down request into deterministic inspect/build/verify steps.",
        )
        .with_actions(actions)
    }
}

/// Prefers the smallest set of changes needed to satisfy the task.
pub struct PragmaticAdvisor;

impl Advisor for PragmaticAdvisor {
    fn id(&self) -> AdvisorId {
        AdvisorId::Pragmatic
    }

    fn propose(&self, task: &Task, _memory_summary: &str) -> Proposal {
        let mut actions = Vec::new();
        if task.mentions("next") {
            actions.push(
                Action::new(self.id(), "scaffold_nextjs", "Scaffold Next.js app")
                    .with_param("app_name", "conclave-app"),
            );
        }
        actions.push(Action::command(
            self.id(),
            "Show concise summary",
            "echo 'Pragmatic pass complete'",
        ));
        Proposal::approve(
            self.id(),
            "Prefer smallest set of changes needed to satisfy the task.",
        )
        .with_actions(actions)
    }
}

/// Screens the raw task text for dangerous instruction patterns.
///
/// This is the advisor the conservative merge policy exists for: its
/// veto halts the session no matter how many peers approve.
pub struct SafeguardAdvisor;

impl SafeguardAdvisor {
    const BLOCK_PATTERNS: [&'static str; 5] = [
        "rm -rf /",
        "delete production",
        "drop database",
        "exfiltrate",
        "malware",
    ];
}

impl Advisor for SafeguardAdvisor {
    fn id(&self) -> AdvisorId {
        AdvisorId::Safeguard
    }

    fn propose(&self, task: &Task, _memory_summary: &str) -> Proposal {
        let lowered = task.text.to_lowercase();
        for pattern in Self::BLOCK_PATTERNS {
            if lowered.contains(pattern) {
                return Proposal::veto(
                    self.id(),
                    format!("Blocked due to dangerous instruction pattern: '{}'.", pattern),
                )
                .with_unblock_requirement("Clarify safe environment and target scope.")
                .with_unblock_requirement("Provide explicit approval for destructive operations.")
                .with_unblock_requirement("Provide rollback/backup strategy.");
            }
        }
        Proposal::approve(self.id(), "No critical safety violations detected.")
            .with_risk("Always validate command scope before execution.")
    }
}

/// Batches related checks and avoids redundant commands.
pub struct EfficiencyAdvisor;

impl Advisor for EfficiencyAdvisor {
    fn id(&self) -> AdvisorId {
        AdvisorId::Efficiency
    }

    fn propose(&self, _task: &Task, _memory_summary: &str) -> Proposal {
        Proposal::approve(self.id(), "Batch related checks and avoid redundant commands.")
            .with_action(Action::command(
                self.id(),
                "Quick health check",
                "git log --oneline -5",
            ))
    }
}

/// Keeps outcomes understandable and operationally actionable.
pub struct HumanImpactAdvisor;

impl Advisor for HumanImpactAdvisor {
    fn id(&self) -> AdvisorId {
        AdvisorId::HumanImpact
    }

    fn propose(&self, _task: &Task, _memory_summary: &str) -> Proposal {
        Proposal::approve(
            self.id(),
            "Keep outputs understandable and include operational next steps.",
        )
        .with_action(Action::command(
            self.id(),
            "Emit operator notice",
            "echo 'HumanImpact: include runbook updates in summary'",
        ))
    }
}
