//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(version, about = "Deliberative task orchestrator - five advisors, one plan")]
#[command(long_about = r#"
Conclave turns a task into a single reproducible plan and carries it out.

The process has three phases:
1. Deliberation: five fixed advisors each propose a vote and candidate actions
2. Merge: veto beats majority, majority beats aggregation; duplicates collapse
3. Execution: the plan runs step by step against the tool registry, fail-fast

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./conclave.toml     Project-level config
3. ~/.config/conclave/config.toml   Global config

Example:
  conclave "run the tests and summarize failures"
  conclave --plan-only "scaffold a next.js frontend"
  conclave serve --bind 127.0.0.1:8787
"#)]
pub struct Cli {
    /// The task to deliberate on (not required with a subcommand)
    pub task: Option<String>,

    /// Repository the tools operate on
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Print the merged plan without executing anything
    #[arg(long)]
    pub plan_only: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the realtime WebSocket gateway
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}
