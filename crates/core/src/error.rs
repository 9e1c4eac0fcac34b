//! Shared error model.

use thiserror::Error;

/// Result type used by the value constructors in this workspace.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure to build a well-formed domain value.
///
/// Authorization outcomes are not errors at this layer; they live in
/// `tradedesk-auth` and in the guard outcomes of `tradedesk-session`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an empty bearer token).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
