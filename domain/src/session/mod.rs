//! Session domain
//!
//! The per-invocation entities: task input, lifecycle phases, and the
//! final outcome handed to the audit log.

pub mod entities;

pub use entities::{SessionMode, SessionOutcome, SessionPhase, SessionStatus, Task};
