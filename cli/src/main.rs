//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection: config → adapters → use case → presentation.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conclave_application::{DeliberateUseCase, RunSessionUseCase, SessionService};
use conclave_domain::{QuorumRule, SessionMode, SessionStatus, Task};
use conclave_infrastructure::{
    ConfigLoader, FileConfig, JsonlMemoryStore, ScriptPreflight, SqliteInboxStore, ToolRegistry,
};
use conclave_presentation::{
    Cli, Command, ConsoleFormatter, GatewayState, ProgressReporter, router,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Initialize logging: stderr filtered by verbosity, plus a daily file
/// log under the state directory.
fn init_tracing(verbose: u8) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let log_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("conclave").join("logs"));

    match log_dir.and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir)) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "conclave.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("could not load configuration")?
    };

    let repo_root = cli
        .repo
        .canonicalize()
        .with_context(|| format!("repository path does not exist: {}", cli.repo.display()))?;

    match cli.command {
        Some(Command::Serve { bind }) => serve(&config, repo_root, bind).await,
        None => {
            let Some(task_text) = cli.task else {
                bail!("A task is required. Try: conclave \"run the tests\"");
            };
            let mode = if cli.plan_only {
                SessionMode::Plan
            } else {
                SessionMode::Exec
            };
            let task = Task::new(task_text).with_repo_root(&repo_root).with_mode(mode);
            run_task(&config, repo_root, task, cli.quiet).await
        }
    }
}

/// Build the session use case from config and adapters.
fn build_service(
    config: &FileConfig,
    repo_root: &Path,
) -> Result<RunSessionUseCase<JsonlMemoryStore, ScriptPreflight, ToolRegistry>> {
    let rule: QuorumRule = config
        .quorum
        .rule
        .parse()
        .context("invalid [quorum] rule in configuration")?;

    let memory = JsonlMemoryStore::new(resolve(repo_root, &config.memory.path))
        .context("could not open memory store")?;
    let preflight = ScriptPreflight::new()
        .with_script(&config.preflight.script)
        .with_enabled(config.preflight.enabled);
    let tools = ToolRegistry::builtin(
        repo_root,
        Duration::from_secs(config.tools.command_timeout_secs),
    );

    Ok(RunSessionUseCase::new(
        Arc::new(memory),
        Arc::new(preflight),
        DeliberateUseCase::standard(),
        Arc::new(tools),
    )
    .with_quorum_rule(rule))
}

/// One-shot task invocation.
async fn run_task(
    config: &FileConfig,
    repo_root: PathBuf,
    task: Task,
    quiet: bool,
) -> Result<ExitCode> {
    let use_case = build_service(config, &repo_root)?;

    let outcome = if quiet {
        use_case.run(task).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.run_with_progress(task, &progress).await?
    };

    println!("{}", ConsoleFormatter::colored().format_outcome(&outcome));

    // A blocked plan is a valid deterministic outcome, not a crash.
    Ok(match outcome.status {
        SessionStatus::Completed | SessionStatus::Blocked => ExitCode::SUCCESS,
        SessionStatus::Failed => ExitCode::from(1),
    })
}

/// Realtime gateway serving concurrent task invocations.
async fn serve(config: &FileConfig, repo_root: PathBuf, bind: Option<String>) -> Result<ExitCode> {
    let service: Arc<dyn SessionService> = Arc::new(build_service(config, &repo_root)?);
    let inbox = Arc::new(
        SqliteInboxStore::open(resolve(&repo_root, &config.gateway.inbox_path))
            .context("could not open inbox store")?,
    );

    let state = GatewayState::new(service, inbox, &repo_root);
    let addr = bind.unwrap_or_else(|| config.gateway.bind.clone());

    info!(%addr, repo = %repo_root.display(), "Gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not bind gateway to {}", addr))?;
    axum::serve(listener, router(state))
        .await
        .context("gateway server failed")?;

    Ok(ExitCode::SUCCESS)
}

fn resolve(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}
