//! Application layer for conclave
//!
//! This crate contains use cases and port definitions. It depends only
//! on the domain layer; adapters for its ports live in infrastructure.
//!
//! The three use cases mirror the session lifecycle: [`DeliberateUseCase`]
//! gathers proposals from the roster, [`ExecutePlanUseCase`] runs a
//! merged plan against the tool registry, and [`RunSessionUseCase`]
//! drives one complete invocation from preflight to the audit write.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    inbox::{InboxError, InboxPort, InboxRecord, InboxStatus},
    memory::{MemoryError, MemoryEvent, MemoryEventKind, MemoryPort, NoMemory},
    preflight::{NoPreflight, PreflightError, PreflightPort},
    progress::{NoProgress, SessionProgress},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::deliberate::DeliberateUseCase;
pub use use_cases::execute_plan::{ExecutePlanError, ExecutePlanUseCase};
pub use use_cases::run_session::{RunSessionUseCase, SessionError, SessionService};
