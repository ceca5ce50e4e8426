//! Deliberate use case
//!
//! Invokes every advisor in the roster and collects their proposals.
//! Advisors are pure and independent, so they run concurrently, but the
//! returned list is always in roster order regardless of completion
//! order, because downstream merging is only deterministic if the
//! input order is.

use conclave_domain::advisor::{Advisor, Proposal, standard_roster};
use conclave_domain::session::Task;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Use case for running one deliberation round.
///
/// Failure semantics: an advisor that panics or returns a structurally
/// invalid proposal is degraded to an abstention with an audit note in
/// its rationale. One advisor can never abort the whole deliberation.
pub struct DeliberateUseCase {
    roster: Vec<Arc<dyn Advisor>>,
}

impl DeliberateUseCase {
    /// Coordinator over the fixed reference roster.
    pub fn standard() -> Self {
        Self::new(standard_roster())
    }

    /// Coordinator over an explicit roster (tests inject stubs here).
    pub fn new(roster: Vec<Arc<dyn Advisor>>) -> Self {
        Self { roster }
    }

    pub fn roster_size(&self) -> usize {
        self.roster.len()
    }

    /// Gather one proposal per roster member, in roster order.
    pub async fn execute(&self, task: &Task, memory_summary: &str) -> Vec<Proposal> {
        debug!("Deliberating with {} advisors", self.roster.len());

        let mut join_set = JoinSet::new();
        for (index, advisor) in self.roster.iter().enumerate() {
            let advisor = Arc::clone(advisor);
            let task = task.clone();
            let summary = memory_summary.to_string();
            join_set.spawn(async move {
                let proposal = advisor.propose(&task, &summary);
                (index, advisor.id(), proposal)
            });
        }

        let mut slots: Vec<Option<Proposal>> = vec![None; self.roster.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, expected, proposal)) => {
                    let proposal = match proposal.validate(expected) {
                        Ok(()) => proposal,
                        Err(defect) => {
                            warn!(advisor = %expected, %defect, "Malformed proposal");
                            Proposal::degraded(expected, defect)
                        }
                    };
                    slots[index] = Some(proposal);
                }
                Err(e) => {
                    // The panicking advisor is identified below by its
                    // still-empty slot.
                    warn!(error = %e, "Advisor task failed");
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let id = self.roster[index].id();
                    Proposal::degraded(id, "advisor invocation failed")
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::advisor::{AdvisorId, Vote};
    use conclave_domain::plan::Action;

    struct StubAdvisor {
        id: AdvisorId,
        proposal: Proposal,
        delay_ms: u64,
    }

    impl Advisor for StubAdvisor {
        fn id(&self) -> AdvisorId {
            self.id
        }

        fn propose(&self, _task: &Task, _memory_summary: &str) -> Proposal {
            if self.delay_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(self.delay_ms));
            }
            self.proposal.clone()
        }
    }

    struct PanickingAdvisor(AdvisorId);

    impl Advisor for PanickingAdvisor {
        fn id(&self) -> AdvisorId {
            self.0
        }

        fn propose(&self, _task: &Task, _memory_summary: &str) -> Proposal {
            panic!("advisor crashed");
        }
    }

    fn stub(id: AdvisorId, proposal: Proposal, delay_ms: u64) -> Arc<dyn Advisor> {
        Arc::new(StubAdvisor {
            id,
            proposal,
            delay_ms,
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_roster_order_preserved_despite_completion_order() {
        // The first advisor finishes last; order must still hold.
        let roster = vec![
            stub(AdvisorId::Logic, Proposal::approve(AdvisorId::Logic, "slow"), 50),
            stub(AdvisorId::Pragmatic, Proposal::approve(AdvisorId::Pragmatic, "fast"), 0),
            stub(AdvisorId::Safeguard, Proposal::approve(AdvisorId::Safeguard, "fast"), 0),
        ];
        let uc = DeliberateUseCase::new(roster);
        let proposals = uc.execute(&Task::new("t"), "").await;

        let ids: Vec<AdvisorId> = proposals.iter().map(|p| p.advisor).collect();
        assert_eq!(ids, vec![AdvisorId::Logic, AdvisorId::Pragmatic, AdvisorId::Safeguard]);
    }

    #[tokio::test]
    async fn test_panicking_advisor_becomes_abstain() {
        let roster: Vec<Arc<dyn Advisor>> = vec![
            Arc::new(PanickingAdvisor(AdvisorId::Logic)),
            stub(AdvisorId::Pragmatic, Proposal::approve(AdvisorId::Pragmatic, "ok"), 0),
        ];
        let uc = DeliberateUseCase::new(roster);
        let proposals = uc.execute(&Task::new("t"), "").await;

        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].advisor, AdvisorId::Logic);
        assert_eq!(proposals[0].vote, Vote::Abstain);
        assert!(proposals[0].rationale.contains("degraded"));
        assert_eq!(proposals[1].vote, Vote::Approve);
    }

    #[tokio::test]
    async fn test_veto_with_actions_becomes_abstain() {
        let malformed = Proposal::veto(AdvisorId::Safeguard, "no").with_action(Action::command(
            AdvisorId::Safeguard,
            "sneaky",
            "echo hi",
        ));
        let uc = DeliberateUseCase::new(vec![stub(AdvisorId::Safeguard, malformed, 0)]);
        let proposals = uc.execute(&Task::new("t"), "").await;

        assert_eq!(proposals[0].vote, Vote::Abstain);
        assert!(proposals[0].actions.is_empty());
    }

    #[tokio::test]
    async fn test_standard_roster_yields_five_proposals() {
        let uc = DeliberateUseCase::standard();
        let proposals = uc.execute(&Task::new("benign task"), "").await;
        assert_eq!(proposals.len(), 5);
    }
}
