//! Console output formatting
//!
//! Renders plans, traces, and session outcomes as text. Color is opt-in
//! so the same formatter serves the terminal (colored) and the gateway
//! (plain text over the wire).

use colored::Colorize;
use conclave_domain::plan::{ExecutionTrace, Plan, StepStatus};
use conclave_domain::session::SessionOutcome;

/// Formatter for user-facing output.
pub struct ConsoleFormatter {
    color: bool,
}

impl ConsoleFormatter {
    /// Formatter with ANSI colors for terminal output.
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Formatter without escape codes, for the gateway and logs.
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, paint: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Render a plan: the blocked banner with unblock requirements, or
    /// the numbered action list.
    pub fn format_plan(&self, plan: &Plan) -> String {
        if plan.blocked {
            let reason = plan.blocking_reason.as_deref().unwrap_or("unknown");
            let mut lines = vec![format!(
                "{} {}",
                self.paint("BLOCKED:", |s| s.red().bold()),
                reason
            )];
            if !plan.unblock_requirements.is_empty() {
                lines.push("Unblock requirements:".to_string());
                for requirement in &plan.unblock_requirements {
                    lines.push(format!("- {}", requirement));
                }
            }
            return lines.join("\n");
        }

        let mut lines = vec![self.paint("Execution Plan:", |s| s.bold())];
        if plan.actions.is_empty() {
            lines.push("(no actions)".to_string());
        }
        for (index, action) in plan.actions.iter().enumerate() {
            lines.push(format!("{}. {} - {}", index + 1, action.tool, action.label));
        }
        lines.join("\n")
    }

    /// Render a full trace, including skipped steps, so the reader can
    /// see exactly how far the plan got.
    pub fn format_trace(&self, trace: &ExecutionTrace) -> String {
        let mut lines = Vec::new();
        for step in &trace.steps {
            let status = match step.status {
                StepStatus::Ok => self.paint("ok", |s| s.green()),
                StepStatus::Failed => self.paint("failed", |s| s.red().bold()),
                StepStatus::Skipped => self.paint("skipped", |s| s.yellow()),
            };
            lines.push(format!(
                "[{}] {} => {}",
                step.action.tool, step.action.label, status
            ));
            if let Some(output) = &step.output
                && !output.trim().is_empty()
            {
                lines.push(output.trim().to_string());
            }
            if let Some(error) = &step.error {
                lines.push(format!("error: {}", error));
            }
        }
        lines.push(format!("Result: {}", trace.summary()));
        lines.join("\n")
    }

    /// Render a complete session outcome. Plan-only outcomes show the
    /// plan alone; executed outcomes append the trace.
    pub fn format_outcome(&self, outcome: &SessionOutcome) -> String {
        let mut text = self.format_plan(&outcome.plan);
        if let Some(trace) = &outcome.trace {
            text.push_str("\n\n");
            text.push_str(&self.format_trace(trace));
        }
        text
    }
}
