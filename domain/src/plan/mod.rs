//! Plan domain
//!
//! Everything between proposals and execution: the [`Action`] unit of
//! work, the [`merge`] policy that reduces competing proposals to one
//! [`Plan`], and the [`ExecutionTrace`] that records what running the
//! plan actually did.

pub mod action;
pub mod entities;
pub mod merge;
pub mod quorum;
pub mod trace;

pub use action::Action;
pub use entities::Plan;
pub use merge::{merge, merge_with_rule};
pub use quorum::QuorumRule;
pub use trace::{ExecutionTrace, StepResult, StepStatus};
