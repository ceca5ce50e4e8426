//! Shell command tool: run_command
//!
//! Runs the action's `command` param through the platform shell. A
//! non-zero exit is a tool failure: a failing command must halt the
//! rest of the plan, so the failure is reported to the executor instead
//! of being folded into successful output.

use async_trait::async_trait;
use conclave_domain::plan::Action;
use conclave_domain::tool::{ToolError, ToolHandler, ToolResult, ToolResultMetadata};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Default timeout for command execution (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Handler for `run_command` actions.
pub struct CommandTool {
    working_dir: PathBuf,
    timeout: Duration,
}

impl CommandTool {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, action: &Action) -> ToolResult {
        let start = Instant::now();

        let command_str = match action.require_string("command") {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
        };

        // Per-action working dir overrides the configured repo root.
        let working_dir = action
            .get_string("working_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.working_dir.clone());
        if !working_dir.is_dir() {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::not_found(format!(
                    "Working directory does not exist: {}",
                    working_dir.display()
                )),
            );
        }

        let timeout = action
            .get_i64("timeout_secs")
            .map(|secs| Duration::from_secs(secs.max(1) as u64))
            .unwrap_or(self.timeout);

        debug!(command = command_str, dir = %working_dir.display(), "Running command");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command_str]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command_str]);
            c
        };
        cmd.current_dir(&working_dir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                return ToolResult::failure(
                    RUN_COMMAND,
                    ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
                );
            }
        };

        let output = match wait_with_timeout(child, timeout) {
            Ok(o) => o,
            Err(_) => {
                return ToolResult::failure(
                    RUN_COMMAND,
                    ToolError::timeout(format!(
                        "Command exceeded {} seconds: {}",
                        timeout.as_secs(),
                        command_str
                    )),
                );
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);
        let combined = combine_output(&output);
        let metadata = ToolResultMetadata {
            duration_ms: Some(duration_ms),
            exit_code: Some(exit_code),
            bytes: Some(combined.len()),
        };

        if output.status.success() {
            ToolResult::success(RUN_COMMAND, combined).with_metadata(metadata)
        } else {
            ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!(
                    "Command exited with code {}: {}",
                    exit_code, command_str
                ))
                .with_details(combined),
            )
            .with_metadata(metadata)
        }
    }
}

#[async_trait]
impl ToolHandler for CommandTool {
    fn name(&self) -> &str {
        RUN_COMMAND
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. Use with caution."
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        let action = action.clone();
        let tool = CommandTool {
            working_dir: self.working_dir.clone(),
            timeout: self.timeout,
        };
        // Blocking process wait; keep it off the async workers.
        match tokio::task::spawn_blocking(move || tool.run(&action)).await {
            Ok(result) => result,
            Err(e) => ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Command task failed: {}", e)),
            ),
        }
    }
}

fn combine_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    if !stdout.is_empty() {
        combined.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }

    if combined.len() > MAX_OUTPUT_SIZE {
        combined.truncate(MAX_OUTPUT_SIZE);
        combined.push_str("\n... (output truncated)");
    }
    combined
}

/// Wait for a child process, killing it when the timeout elapses.
fn wait_with_timeout(
    mut child: std::process::Child,
    timeout: Duration,
) -> Result<Output, String> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();
                let stderr = child
                    .stderr
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();
                return Ok(Output {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err("Command timed out".to_string());
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(format!("Failed to wait for process: {}", e)),
        }
    }
}
