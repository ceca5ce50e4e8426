//! Presentation layer for conclave
//!
//! Everything user-facing: the clap CLI definition, console formatting
//! and progress, and the realtime WebSocket gateway. Depends on domain
//! and application only; wiring happens in the binary.

pub mod cli;
pub mod gateway;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::{Cli, Command};
pub use gateway::{GatewayRequest, GatewayResponse, GatewayState, router};
pub use output::ConsoleFormatter;
pub use progress::ProgressReporter;
