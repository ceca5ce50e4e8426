//! Realtime gateway
//!
//! The WebSocket front end: wire protocol types and the axum router
//! that maps each request to one isolated session run.

pub mod protocol;
pub mod server;

pub use protocol::{GatewayRequest, GatewayResponse};
pub use server::{GatewayState, router};
