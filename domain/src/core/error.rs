//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid session mode '{0}': expected 'plan' or 'exec'")]
    InvalidMode(String),

    #[error("Invalid quorum rule '{0}': valid forms are majority, unanimous, atleast:N")]
    InvalidQuorumRule(String),
}
