//! Transport failure categories.
//!
//! These describe calls that never produced an HTTP status. They are kept
//! apart from status codes so that a network outage is never mistaken for
//! a 5xx answer from the service.

use serde::{Deserialize, Serialize};

/// Categories of transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The request could not be built (bad URL, header or body).
    InvalidRequest,

    /// A local attachment could not be read.
    LocalFile,

    /// DNS resolution failed.
    DnsError,

    /// Connection was refused by the server.
    ConnectionRefused,

    /// Could not establish or keep the connection.
    ConnectionFailed,

    /// Request timed out.
    Timeout,

    /// The response body could not be read.
    InvalidResponse,

    /// Unknown or unexpected error.
    Unknown,
}

impl TransportErrorKind {
    /// Returns a stable snake_case label, used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::LocalFile => "local_file",
            Self::DnsError => "dns_error",
            Self::ConnectionRefused => "connection_refused",
            Self::ConnectionFailed => "connection_failed",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true if the failure happened before anything was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::InvalidRequest | Self::LocalFile)
    }
}
