//! Execute Plan use case
//!
//! Runs a merged plan's actions in order against the tool registry.
//! Strictly sequential: later actions may assume the filesystem and tool
//! state left by earlier ones. The first unresolvable or failed step
//! stops the plan; everything after it is recorded as skipped so the
//! trace still covers the full intended plan.

use crate::ports::progress::{NoProgress, SessionProgress};
use crate::ports::tool_executor::ToolExecutorPort;
use conclave_domain::plan::{ExecutionTrace, Plan, StepResult};
use conclave_domain::tool::ToolError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when starting plan execution.
#[derive(Error, Debug)]
pub enum ExecutePlanError {
    /// Executing a blocked plan is a programming error in the caller,
    /// not a runtime condition; it is refused before any side effect.
    #[error("Attempted to execute a blocked plan: {reason}")]
    BlockedPlan { reason: String },
}

/// Use case for executing a merged plan.
pub struct ExecutePlanUseCase<T: ToolExecutorPort> {
    tools: Arc<T>,
}

impl<T: ToolExecutorPort> ExecutePlanUseCase<T> {
    pub fn new(tools: Arc<T>) -> Self {
        Self { tools }
    }

    /// Execute with no progress reporting.
    pub async fn execute(&self, plan: &Plan) -> Result<ExecutionTrace, ExecutePlanError> {
        self.execute_with_progress(plan, &NoProgress).await
    }

    /// Execute every action in order, fail-fast, and return the trace.
    ///
    /// The plan itself is never mutated.
    pub async fn execute_with_progress(
        &self,
        plan: &Plan,
        progress: &dyn SessionProgress,
    ) -> Result<ExecutionTrace, ExecutePlanError> {
        if plan.blocked {
            return Err(ExecutePlanError::BlockedPlan {
                reason: plan
                    .blocking_reason
                    .clone()
                    .unwrap_or_else(|| "no reason recorded".to_string()),
            });
        }

        let total = plan.len();
        let mut steps = Vec::with_capacity(total);
        let mut actions = plan.actions.iter();

        for (index, action) in actions.by_ref().enumerate() {
            progress.on_step_start(index + 1, total, action);

            let step = if self.tools.has_tool(&action.tool) {
                let result = self.tools.execute(action).await;
                if result.is_success() {
                    StepResult::ok(action.clone(), result.output().unwrap_or("").to_string())
                } else {
                    let error = result
                        .error()
                        .cloned()
                        .unwrap_or_else(|| ToolError::execution_failed("tool reported failure"));
                    StepResult::failed(action.clone(), error)
                }
            } else {
                warn!(tool = %action.tool, "Unregistered action type");
                StepResult::failed(action.clone(), ToolError::unknown_action_type(&action.tool))
            };

            let failed = !step.is_ok();
            progress.on_step_complete(index + 1, total, &step);
            steps.push(step);

            if failed {
                debug!(step = index + 1, total, "Plan stopped early");
                break;
            }
        }

        // Steps never reached stay in the trace as skipped, preserving
        // the full intended plan for audit.
        for action in actions {
            let step = StepResult::skipped(action.clone());
            progress.on_step_complete(steps.len() + 1, total, &step);
            steps.push(step);
        }

        Ok(ExecutionTrace::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conclave_domain::advisor::AdvisorId;
    use conclave_domain::plan::{Action, StepStatus};
    use conclave_domain::tool::ToolResult;
    use std::sync::Mutex;

    /// Executor stub: succeeds unless the command param says otherwise,
    /// and records every invocation.
    struct StubExecutor {
        known: Vec<String>,
        invoked: Mutex<Vec<String>>,
    }

    impl StubExecutor {
        fn new(known: &[&str]) -> Self {
            Self {
                known: known.iter().map(|s| s.to_string()).collect(),
                invoked: Mutex::new(Vec::new()),
            }
        }

        fn invocations(&self) -> Vec<String> {
            self.invoked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for StubExecutor {
        fn has_tool(&self, tool: &str) -> bool {
            self.known.iter().any(|k| k == tool)
        }

        fn tool_names(&self) -> Vec<String> {
            self.known.clone()
        }

        async fn execute(&self, action: &Action) -> ToolResult {
            let command = action.get_string("command").unwrap_or("").to_string();
            self.invoked.lock().unwrap().push(command.clone());
            if command.contains("fail") {
                ToolResult::failure(&action.tool, ToolError::execution_failed("exit 1"))
            } else {
                ToolResult::success(&action.tool, format!("ran: {}", command))
            }
        }
    }

    fn command(cmd: &str) -> Action {
        Action::command(AdvisorId::Logic, cmd, cmd)
    }

    #[tokio::test]
    async fn test_full_success() {
        let tools = Arc::new(StubExecutor::new(&["run_command"]));
        let uc = ExecutePlanUseCase::new(Arc::clone(&tools));
        let plan = Plan::ready(vec![command("echo a"), command("echo b")]);

        let trace = uc.execute(&plan).await.unwrap();
        assert!(trace.succeeded());
        assert_eq!(trace.counts(), (2, 0, 0));
        assert_eq!(tools.invocations(), vec!["echo a", "echo b"]);
    }

    #[tokio::test]
    async fn test_fail_fast_records_skipped_and_never_invokes_later_tools() {
        let tools = Arc::new(StubExecutor::new(&["run_command"]));
        let uc = ExecutePlanUseCase::new(Arc::clone(&tools));
        let plan = Plan::ready(vec![command("echo a"), command("fail now"), command("echo c")]);

        let trace = uc.execute(&plan).await.unwrap();
        let statuses: Vec<StepStatus> = trace.steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StepStatus::Ok, StepStatus::Failed, StepStatus::Skipped]
        );
        // Step 3's tool was never invoked
        assert_eq!(tools.invocations(), vec!["echo a", "fail now"]);
        assert_eq!(
            trace.first_failure().unwrap().error.as_ref().unwrap().code,
            "EXECUTION_FAILED"
        );
    }

    #[tokio::test]
    async fn test_unknown_action_type_stops_plan() {
        let tools = Arc::new(StubExecutor::new(&["run_command"]));
        let uc = ExecutePlanUseCase::new(Arc::clone(&tools));
        let plan = Plan::ready(vec![
            Action::new(AdvisorId::Logic, "teleport", "Teleport somewhere"),
            command("echo a"),
        ]);

        let trace = uc.execute(&plan).await.unwrap();
        assert_eq!(trace.steps[0].status, StepStatus::Failed);
        assert_eq!(
            trace.steps[0].error.as_ref().unwrap().code,
            "UNKNOWN_ACTION_TYPE"
        );
        assert_eq!(trace.steps[1].status, StepStatus::Skipped);
        assert!(tools.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_blocked_plan_is_refused() {
        let tools = Arc::new(StubExecutor::new(&["run_command"]));
        let uc = ExecutePlanUseCase::new(Arc::clone(&tools));
        let plan = Plan::blocked("vetoed by Safeguard");

        let err = uc.execute(&plan).await.unwrap_err();
        assert!(matches!(err, ExecutePlanError::BlockedPlan { .. }));
        assert!(tools.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_yields_empty_trace() {
        let tools = Arc::new(StubExecutor::new(&["run_command"]));
        let uc = ExecutePlanUseCase::new(tools);
        let trace = uc.execute(&Plan::ready(Vec::new())).await.unwrap();
        assert!(trace.is_empty());
        assert!(trace.succeeded());
    }
}
