//! Builtin tool handlers and the registry that routes actions to them.

pub mod command;
pub mod registry;
pub mod scaffold;
pub mod tests_runner;

pub use command::{CommandTool, RUN_COMMAND};
pub use registry::ToolRegistry;
pub use scaffold::{SCAFFOLD_NEXTJS, ScaffoldTool};
pub use tests_runner::{RUN_TESTS, TestsTool};
