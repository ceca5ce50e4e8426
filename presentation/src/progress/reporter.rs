//! Terminal progress reporting
//!
//! Spinner during deliberation, step counter during execution. All
//! output goes through indicatif so it coexists with tracing's stderr
//! writer.

use conclave_application::ports::progress::SessionProgress;
use conclave_domain::advisor::Proposal;
use conclave_domain::plan::{Action, Plan, StepResult, StepStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Console progress reporter implementing [`SessionProgress`].
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner(&self, message: String) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message);
        self.replace(Some(bar));
    }

    fn replace(&self, next: Option<ProgressBar>) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = next;
        }
    }

    fn println(&self, message: String) {
        if let Ok(slot) = self.bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            bar.println(message);
            return;
        }
        println!("{}", message);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgress for ProgressReporter {
    fn on_deliberation_start(&self, roster_size: usize) {
        self.spinner(format!("Deliberating with {} advisors...", roster_size));
    }

    fn on_proposal(&self, proposal: &Proposal) {
        self.println(format!("  {} votes {}", proposal.advisor, proposal.vote));
    }

    fn on_plan_merged(&self, plan: &Plan) {
        // Deliberation spinner ends here; execution steps start their own.
        self.replace(None);
        if !plan.blocked {
            self.println(format!("Plan merged: {} actions", plan.len()));
        }
    }

    fn on_step_start(&self, index: usize, total: usize, action: &Action) {
        self.spinner(format!("[{}/{}] {}", index, total, action.label));
    }

    fn on_step_complete(&self, index: usize, total: usize, result: &StepResult) {
        let marker = match result.status {
            StepStatus::Ok => "ok",
            StepStatus::Failed => "FAILED",
            StepStatus::Skipped => "skipped",
        };
        self.println(format!(
            "[{}/{}] {} => {}",
            index, total, result.action.label, marker
        ));
        if index == total {
            self.replace(None);
        }
    }
}
