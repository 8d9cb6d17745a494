//! Domain error types

use thiserror::Error;

/// Errors raised while interpreting a response payload as a typed value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The response body was not JSON.
    #[error("response body is not JSON: {0}")]
    NotJson(String),

    /// The JSON body did not have the expected shape.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
