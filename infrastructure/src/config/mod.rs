//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, GatewayConfig, MemoryConfig, PreflightConfig, QuorumConfig, ToolsConfig,
};
pub use loader::ConfigLoader;
