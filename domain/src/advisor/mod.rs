//! Advisor domain
//!
//! The closed roster of deliberation perspectives and the proposal
//! types they produce. Advisors are pure: all of their influence on the
//! world goes through the merged plan.

pub mod identity;
pub mod proposal;
pub mod roster;

pub use identity::AdvisorId;
pub use proposal::{Proposal, ProposalDefect, Vote};
pub use roster::{
    Advisor, EfficiencyAdvisor, HumanImpactAdvisor, LogicAdvisor, PragmaticAdvisor,
    SafeguardAdvisor, standard_roster,
};
