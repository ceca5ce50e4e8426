//! Tool domain
//!
//! Value objects for tool invocation outcomes and the handler seam the
//! infrastructure registry plugs into. The registry itself is external
//! configuration, injected into the executor.

pub mod handler;
pub mod value_objects;

pub use handler::ToolHandler;
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
