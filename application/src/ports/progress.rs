//! Progress notification port
//!
//! Callbacks for observing a session as it runs. Implementations live in
//! the presentation layer (console spinner, step counter); the core only
//! emits events.

use conclave_domain::advisor::Proposal;
use conclave_domain::plan::{Action, Plan, StepResult};

/// Callback surface for session progress.
pub trait SessionProgress: Send + Sync {
    /// Deliberation is starting with the given roster size.
    fn on_deliberation_start(&self, roster_size: usize);

    /// One advisor's proposal arrived (in roster order).
    fn on_proposal(&self, proposal: &Proposal);

    /// Merging finished.
    fn on_plan_merged(&self, plan: &Plan);

    /// A step is about to run (1-indexed over the plan).
    fn on_step_start(&self, index: usize, total: usize, action: &Action);

    /// A step finished (or was skipped).
    fn on_step_complete(&self, index: usize, total: usize, result: &StepResult);
}

/// No-op progress for tests and quiet mode.
pub struct NoProgress;

impl SessionProgress for NoProgress {
    fn on_deliberation_start(&self, _roster_size: usize) {}
    fn on_proposal(&self, _proposal: &Proposal) {}
    fn on_plan_merged(&self, _plan: &Plan) {}
    fn on_step_start(&self, _index: usize, _total: usize, _action: &Action) {}
    fn on_step_complete(&self, _index: usize, _total: usize, _result: &StepResult) {}
}
