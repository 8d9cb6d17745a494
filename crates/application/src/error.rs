//! Application error types

use petfriends_domain::{DomainError, StatusCode};
use thiserror::Error;

use crate::ports::ClientError;

/// Application-level errors raised by use cases.
///
/// The client itself never fails on an HTTP status; only use cases that
/// need a successful answer to continue turn a status into an error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A payload could not be decoded.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The call never produced an HTTP status.
    #[error("transport error: {0}")]
    Client(#[from] ClientError),

    /// The service did not issue an API key.
    #[error("authentication rejected with status {status}")]
    AuthenticationRejected {
        /// Status returned by the key endpoint.
        status: StatusCode,
    },

    /// A step required a 2xx status and got something else.
    #[error("{operation} returned {status}: {body}")]
    UnexpectedStatus {
        /// Operation name.
        operation: &'static str,
        /// Status returned.
        status: StatusCode,
        /// Body excerpt.
        body: String,
    },

    /// The account still owns no pets after trying to create one.
    #[error("there are no pets owned by this account")]
    NoOwnPets,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
