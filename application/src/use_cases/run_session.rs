//! Run Session use case
//!
//! Drives the full sequence for one invocation:
//! preflight → memory load → deliberation → merge → plan-only
//! short-circuit or execution → audit log. The audit write is the one
//! step that must not be lost: it runs exactly once per invocation, is
//! retried once, and an ultimately failed write is surfaced as an error
//! rather than swallowed.

use crate::ports::memory::{MemoryEvent, MemoryPort};
use crate::ports::preflight::PreflightPort;
use crate::ports::progress::{NoProgress, SessionProgress};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::deliberate::DeliberateUseCase;
use crate::use_cases::execute_plan::{ExecutePlanError, ExecutePlanUseCase};
use async_trait::async_trait;
use conclave_domain::plan::{QuorumRule, merge_with_rule};
use conclave_domain::session::{SessionOutcome, SessionPhase, Task};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end a session without a logged outcome.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The audit write failed even after a retry. Losing the audit
    /// trail is the one unacceptable failure mode.
    #[error("Audit write failed after retry: {0}")]
    AuditWriteFailed(String),

    #[error(transparent)]
    ExecutePlan(#[from] ExecutePlanError),
}

/// Object-safe front for transports that hold the controller behind a
/// pointer. Each call runs one fully isolated session; the service
/// itself keeps no mutable state between calls.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn run(&self, task: Task) -> Result<SessionOutcome, SessionError>;
}

/// Use case driving one complete session.
pub struct RunSessionUseCase<M, P, T>
where
    M: MemoryPort,
    P: PreflightPort,
    T: ToolExecutorPort,
{
    memory: Arc<M>,
    preflight: Arc<P>,
    deliberation: DeliberateUseCase,
    executor: ExecutePlanUseCase<T>,
    rule: QuorumRule,
}

impl<M, P, T> RunSessionUseCase<M, P, T>
where
    M: MemoryPort,
    P: PreflightPort,
    T: ToolExecutorPort,
{
    pub fn new(
        memory: Arc<M>,
        preflight: Arc<P>,
        deliberation: DeliberateUseCase,
        tools: Arc<T>,
    ) -> Self {
        Self {
            memory,
            preflight,
            deliberation,
            executor: ExecutePlanUseCase::new(tools),
            rule: QuorumRule::default(),
        }
    }

    /// Override the quorum rule (default: majority of the roster).
    pub fn with_quorum_rule(mut self, rule: QuorumRule) -> Self {
        self.rule = rule;
        self
    }

    /// Run one session with no progress reporting.
    pub async fn run(&self, task: Task) -> Result<SessionOutcome, SessionError> {
        self.run_with_progress(task, &NoProgress).await
    }

    /// Run one session, reporting progress along the way.
    pub async fn run_with_progress(
        &self,
        task: Task,
        progress: &dyn SessionProgress,
    ) -> Result<SessionOutcome, SessionError> {
        let mut phase = SessionPhase::Init;
        info!(task = %task.text, mode = %task.mode, "Session starting");

        // Preflight: best-effort, failure never blocks deliberation.
        phase = self.transition(phase, SessionPhase::Preflight);
        if let Err(e) = self.preflight.run(&task.repo_root).await {
            warn!(error = %e, "Preflight failed; continuing");
        }

        // Memory: degrade to an empty summary so advisors still run,
        // just with less context.
        phase = self.transition(phase, SessionPhase::MemoryLoaded);
        let memory_summary = match self.memory.read_summary().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Memory summary unavailable; proceeding with empty context");
                String::new()
            }
        };

        phase = self.transition(phase, SessionPhase::Deliberated);
        progress.on_deliberation_start(self.deliberation.roster_size());
        let proposals = self.deliberation.execute(&task, &memory_summary).await;
        for proposal in &proposals {
            progress.on_proposal(proposal);
        }

        phase = self.transition(phase, SessionPhase::Merged);
        let plan = merge_with_rule(&proposals, self.rule);
        progress.on_plan_merged(&plan);

        let outcome = if plan.blocked {
            // Blocked beats plan-only and exec alike.
            SessionOutcome::blocked(task, plan)
        } else if task.mode.is_plan_only() {
            phase = self.transition(phase, SessionPhase::PlanOnlyDone);
            SessionOutcome::plan_only(task, plan)
        } else {
            phase = self.transition(phase, SessionPhase::Executed);
            let trace = self.executor.execute_with_progress(&plan, progress).await?;
            SessionOutcome::executed(task, plan, trace)
        };

        phase = self.transition(phase, SessionPhase::Logged);
        self.write_audit_event(&outcome).await?;
        debug!(phase = %phase, status = %outcome.status, "Session finished");

        Ok(outcome)
    }

    fn transition(&self, from: SessionPhase, to: SessionPhase) -> SessionPhase {
        debug!(from = %from, to = %to, "Session phase transition");
        to
    }

    /// The structured audit record: task text, plan or blocking reason,
    /// trace summary, status. Written exactly once per invocation.
    async fn write_audit_event(&self, outcome: &SessionOutcome) -> Result<(), SessionError> {
        let record = serde_json::json!({
            "summary": outcome.audit_summary(),
            "task": outcome.task.text,
            "mode": outcome.task.mode.as_str(),
            "status": outcome.status.as_str(),
            "blocking_reason": outcome.plan.blocking_reason,
            "planned_actions": outcome.plan.actions.iter()
                .map(|a| format!("{}: {}", a.tool, a.label))
                .collect::<Vec<_>>(),
            "trace": outcome.trace.as_ref().map(|t| t.summary()),
        });
        let content = record.to_string();

        let event = MemoryEvent::session_outcome(content.clone());
        if self.memory.write_event(event).await.is_ok() {
            return Ok(());
        }

        warn!("Audit write failed; retrying once");
        self.memory
            .write_event(MemoryEvent::session_outcome(content))
            .await
            .map_err(|e| SessionError::AuditWriteFailed(e.to_string()))
    }
}

#[async_trait]
impl<M, P, T> SessionService for RunSessionUseCase<M, P, T>
where
    M: MemoryPort + 'static,
    P: PreflightPort + 'static,
    T: ToolExecutorPort + 'static,
{
    async fn run(&self, task: Task) -> Result<SessionOutcome, SessionError> {
        RunSessionUseCase::run(self, task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::memory::{MemoryError, NoMemory};
    use crate::ports::preflight::{NoPreflight, PreflightError};
    use conclave_domain::advisor::{Advisor, AdvisorId, Proposal};
    use conclave_domain::plan::Action;
    use conclave_domain::session::{SessionMode, SessionStatus};
    use conclave_domain::tool::{ToolError, ToolResult};
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== stub ports ====================

    struct RecordingMemory {
        summary: Result<String, ()>,
        fail_writes: usize,
        writes: Mutex<Vec<MemoryEvent>>,
        attempts: AtomicUsize,
    }

    impl RecordingMemory {
        fn new() -> Self {
            Self {
                summary: Ok("{\"recent\":[]}".to_string()),
                fail_writes: 0,
                writes: Mutex::new(Vec::new()),
                attempts: AtomicUsize::new(0),
            }
        }

        fn failing_reads() -> Self {
            Self {
                summary: Err(()),
                ..Self::new()
            }
        }

        fn failing_writes(n: usize) -> Self {
            Self {
                fail_writes: n,
                ..Self::new()
            }
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }

        fn last_write(&self) -> MemoryEvent {
            self.writes.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl MemoryPort for RecordingMemory {
        async fn read_summary(&self) -> Result<String, MemoryError> {
            self.summary
                .clone()
                .map_err(|_| MemoryError::Unavailable("down".into()))
        }

        async fn write_event(&self, event: MemoryEvent) -> Result<(), MemoryError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_writes {
                return Err(MemoryError::WriteFailed("disk full".into()));
            }
            self.writes.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct FailingPreflight;

    #[async_trait]
    impl PreflightPort for FailingPreflight {
        async fn run(&self, _repo_root: &Path) -> Result<(), PreflightError> {
            Err(PreflightError::HookFailed("start.sh exited 1".into()))
        }
    }

    struct CountingExecutor {
        calls: AtomicUsize,
    }

    impl CountingExecutor {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToolExecutorPort for CountingExecutor {
        fn has_tool(&self, tool: &str) -> bool {
            tool == "run_command"
        }

        fn tool_names(&self) -> Vec<String> {
            vec!["run_command".to_string()]
        }

        async fn execute(&self, action: &Action) -> ToolResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let command = action.get_string("command").unwrap_or("");
            if command.contains("fail") {
                ToolResult::failure(&action.tool, ToolError::execution_failed("exit 1"))
            } else {
                ToolResult::success(&action.tool, "ok")
            }
        }
    }

    // ==================== stub advisors ====================

    struct FixedAdvisor {
        id: AdvisorId,
        proposal: Proposal,
    }

    impl Advisor for FixedAdvisor {
        fn id(&self) -> AdvisorId {
            self.id
        }

        fn propose(&self, _task: &Task, _memory_summary: &str) -> Proposal {
            self.proposal.clone()
        }
    }

    fn fixed(id: AdvisorId, proposal: Proposal) -> Arc<dyn Advisor> {
        Arc::new(FixedAdvisor { id, proposal })
    }

    /// Three approvals (with one duplicated action), two abstentions.
    fn scenario_a_roster() -> Vec<Arc<dyn Advisor>> {
        let dup = |id| Action::command(id, "Inspect", "git status --short");
        vec![
            fixed(
                AdvisorId::Logic,
                Proposal::approve(AdvisorId::Logic, "ok").with_action(dup(AdvisorId::Logic)),
            ),
            fixed(
                AdvisorId::Pragmatic,
                Proposal::approve(AdvisorId::Pragmatic, "ok")
                    .with_action(dup(AdvisorId::Pragmatic))
                    .with_action(Action::command(AdvisorId::Pragmatic, "Summary", "echo done")),
            ),
            fixed(
                AdvisorId::Safeguard,
                Proposal::approve(AdvisorId::Safeguard, "safe").with_action(dup(AdvisorId::Safeguard)),
            ),
            fixed(AdvisorId::Efficiency, Proposal::abstain(AdvisorId::Efficiency, "")),
            fixed(AdvisorId::HumanImpact, Proposal::abstain(AdvisorId::HumanImpact, "")),
        ]
    }

    fn veto_roster() -> Vec<Arc<dyn Advisor>> {
        vec![
            fixed(AdvisorId::Logic, Proposal::approve(AdvisorId::Logic, "ok")),
            fixed(AdvisorId::Pragmatic, Proposal::approve(AdvisorId::Pragmatic, "ok")),
            fixed(
                AdvisorId::Safeguard,
                Proposal::veto(AdvisorId::Safeguard, "dangerous pattern"),
            ),
            fixed(AdvisorId::Efficiency, Proposal::approve(AdvisorId::Efficiency, "ok")),
            fixed(AdvisorId::HumanImpact, Proposal::approve(AdvisorId::HumanImpact, "ok")),
        ]
    }

    fn use_case(
        memory: Arc<RecordingMemory>,
        tools: Arc<CountingExecutor>,
        roster: Vec<Arc<dyn Advisor>>,
    ) -> RunSessionUseCase<RecordingMemory, NoPreflight, CountingExecutor> {
        RunSessionUseCase::new(
            memory,
            Arc::new(NoPreflight),
            DeliberateUseCase::new(roster),
            tools,
        )
    }

    // ==================== scenarios ====================

    #[tokio::test]
    async fn test_scenario_a_duplicates_merge_and_execute_fully() {
        let memory = Arc::new(RecordingMemory::new());
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), Arc::clone(&tools), scenario_a_roster());

        let outcome = uc.run(Task::new("tidy the repo")).await.unwrap();

        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(outcome.plan.len(), 2); // duplicate collapsed
        let trace = outcome.trace.unwrap();
        assert_eq!(trace.counts(), (2, 0, 0));
        assert_eq!(tools.call_count(), 2);
        assert_eq!(memory.write_count(), 1);
    }

    #[tokio::test]
    async fn test_scenario_b_safeguard_veto_blocks_everything() {
        let memory = Arc::new(RecordingMemory::new());
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), Arc::clone(&tools), veto_roster());

        let outcome = uc.run(Task::new("drop database")).await.unwrap();

        assert_eq!(outcome.status, SessionStatus::Blocked);
        assert!(outcome.plan.blocked);
        assert!(
            outcome
                .plan
                .blocking_reason
                .as_deref()
                .unwrap()
                .contains("Safeguard")
        );
        assert!(outcome.trace.is_none());
        assert_eq!(tools.call_count(), 0);
        assert_eq!(memory.write_count(), 1);
    }

    #[tokio::test]
    async fn test_scenario_c_plan_only_runs_no_tools() {
        let memory = Arc::new(RecordingMemory::new());
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), Arc::clone(&tools), scenario_a_roster());

        let outcome = uc
            .run(Task::new("tidy the repo").with_mode(SessionMode::Plan))
            .await
            .unwrap();

        assert_eq!(outcome.status, SessionStatus::Completed);
        assert!(!outcome.plan.blocked);
        assert!(outcome.trace.is_none());
        assert_eq!(tools.call_count(), 0);
        assert_eq!(memory.write_count(), 1);
        let logged = memory.last_write();
        assert!(logged.content.contains("\"mode\":\"plan\""));
    }

    #[tokio::test]
    async fn test_failed_execution_still_logs_once() {
        let roster = vec![
            fixed(
                AdvisorId::Logic,
                Proposal::approve(AdvisorId::Logic, "ok")
                    .with_action(Action::command(AdvisorId::Logic, "boom", "fail hard"))
                    .with_action(Action::command(AdvisorId::Logic, "later", "echo later")),
            ),
            fixed(AdvisorId::Pragmatic, Proposal::approve(AdvisorId::Pragmatic, "ok")),
            fixed(AdvisorId::Safeguard, Proposal::approve(AdvisorId::Safeguard, "ok")),
            fixed(AdvisorId::Efficiency, Proposal::abstain(AdvisorId::Efficiency, "")),
            fixed(AdvisorId::HumanImpact, Proposal::abstain(AdvisorId::HumanImpact, "")),
        ];
        let memory = Arc::new(RecordingMemory::new());
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), Arc::clone(&tools), roster);

        let outcome = uc.run(Task::new("risky work")).await.unwrap();

        assert_eq!(outcome.status, SessionStatus::Failed);
        let trace = outcome.trace.unwrap();
        assert_eq!(trace.counts(), (0, 1, 1));
        assert_eq!(memory.write_count(), 1);
        assert!(memory.last_write().content.contains("task failed"));
    }

    #[tokio::test]
    async fn test_degraded_collaborators_do_not_stop_the_session() {
        // Preflight fails and memory reads fail; deliberation proceeds
        // with an empty summary and the outcome is still logged.
        let memory = Arc::new(RecordingMemory::failing_reads());
        let tools = Arc::new(CountingExecutor::new());
        let uc = RunSessionUseCase::new(
            Arc::clone(&memory),
            Arc::new(FailingPreflight),
            DeliberateUseCase::new(scenario_a_roster()),
            Arc::clone(&tools),
        );

        let outcome = uc.run(Task::new("carry on")).await.unwrap();
        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(memory.write_count(), 1);
    }

    #[tokio::test]
    async fn test_audit_write_retries_once_then_succeeds() {
        let memory = Arc::new(RecordingMemory::failing_writes(1));
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), tools, scenario_a_roster());

        let outcome = uc.run(Task::new("persist me")).await.unwrap();
        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(memory.write_count(), 1);
    }

    #[tokio::test]
    async fn test_audit_write_failure_after_retry_is_fatal() {
        let memory = Arc::new(RecordingMemory::failing_writes(2));
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(Arc::clone(&memory), tools, scenario_a_roster());

        let err = uc.run(Task::new("persist me")).await.unwrap_err();
        assert!(matches!(err, SessionError::AuditWriteFailed(_)));
        assert_eq!(memory.write_count(), 0);
    }

    #[tokio::test]
    async fn test_determinism_same_inputs_same_plan_bytes() {
        let memory = Arc::new(RecordingMemory::new());
        let tools = Arc::new(CountingExecutor::new());
        let uc = use_case(memory, tools, scenario_a_roster());

        let task = Task::new("tidy the repo").with_mode(SessionMode::Plan);
        let first = uc.run(task.clone()).await.unwrap();
        let second = uc.run(task).await.unwrap();

        assert_eq!(
            serde_json::to_vec(&first.plan).unwrap(),
            serde_json::to_vec(&second.plan).unwrap()
        );
    }

    #[tokio::test]
    async fn test_session_service_object_safety() {
        let uc = use_case(
            Arc::new(RecordingMemory::new()),
            Arc::new(CountingExecutor::new()),
            scenario_a_roster(),
        );
        let service: Arc<dyn SessionService> = Arc::new(uc);
        let outcome = service
            .run(Task::new("via trait object").with_mode(SessionMode::Plan))
            .await
            .unwrap();
        assert_eq!(outcome.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_no_memory_port_still_completes() {
        let uc = RunSessionUseCase::new(
            Arc::new(NoMemory),
            Arc::new(NoPreflight),
            DeliberateUseCase::new(scenario_a_roster()),
            Arc::new(CountingExecutor::new()),
        );
        let outcome = uc.run(Task::new("x").with_mode(SessionMode::Plan)).await.unwrap();
        assert_eq!(outcome.status, SessionStatus::Completed);
    }
}
