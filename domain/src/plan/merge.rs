//! Plan merging
//!
//! Reduces a set of proposals to one executable [`Plan`] under a fixed,
//! deliberately conservative policy: veto beats majority, majority beats
//! aggregation. A single risk-dedicated advisor can always halt an
//! unsafe action set; that property is the point of the whole design.
//!
//! The merge is pure and deterministic: for the same proposals in the
//! same order it produces a byte-identical plan.

use super::action::Action;
use super::entities::Plan;
use super::quorum::QuorumRule;
use crate::advisor::{Proposal, Vote};
use std::collections::HashSet;

/// Merge proposals under the default majority rule.
pub fn merge(proposals: &[Proposal]) -> Plan {
    merge_with_rule(proposals, QuorumRule::Majority)
}

/// Merge proposals under an explicit quorum rule.
///
/// Policy, in order:
/// 1. any veto blocks the plan, naming every vetoing advisor;
/// 2. approvals must satisfy `rule` against the fixed roster size;
/// 3. approved proposals contribute actions in roster order;
/// 4. literal `(tool, params)` duplicates are dropped, first wins.
pub fn merge_with_rule(proposals: &[Proposal], rule: QuorumRule) -> Plan {
    let vetoes: Vec<&Proposal> = proposals.iter().filter(|p| p.vote.is_veto()).collect();
    if !vetoes.is_empty() {
        let reason = vetoes
            .iter()
            .map(|p| format!("vetoed by {}: {}", p.advisor, p.rationale))
            .collect::<Vec<_>>()
            .join("; ");
        let requirements = vetoes
            .iter()
            .flat_map(|p| p.unblock_requirements.iter().cloned());
        return Plan::blocked(reason).with_unblock_requirements(requirements);
    }

    let roster_size = crate::advisor::AdvisorId::COUNT;
    let approvals = proposals.iter().filter(|p| p.vote.is_approve()).count();
    if !rule.is_satisfied(approvals, roster_size) {
        return Plan::blocked(format!(
            "insufficient approval: {} of {} approved, {} required",
            approvals,
            roster_size,
            rule.min_approvals(roster_size)
        ));
    }

    let mut seen = HashSet::new();
    let mut actions: Vec<Action> = Vec::new();
    for proposal in proposals {
        if proposal.vote != Vote::Approve {
            continue;
        }
        for action in &proposal.actions {
            if seen.insert(action.dedup_key()) {
                actions.push(action.clone());
            }
        }
    }

    Plan::ready(actions)
}
