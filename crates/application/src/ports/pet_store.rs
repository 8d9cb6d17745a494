//! PetFriends API port

use std::future::Future;
use std::path::Path;

use petfriends_domain::{
    ApiResponse, AuthKey, Credentials, PetFields, PetFilter, PetId, TransportErrorKind,
};
use thiserror::Error;

/// Transport-level failures.
///
/// Any HTTP status, including 4xx and 5xx, is returned as an
/// [`ApiResponse`]. A `ClientError` means no status was obtained at all.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value could not be encoded.
    #[error("invalid value for header `{name}`: {message}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Encoder message.
        message: String,
    },

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// A photo attachment could not be read from disk.
    #[error("failed to read photo {path}: {message}")]
    PhotoRead {
        /// Path given by the caller.
        path: String,
        /// I/O message.
        message: String,
    },

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// Any other client failure.
    #[error("HTTP client error: {0}")]
    Other(String),
}

impl ClientError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        match self {
            Self::InvalidUrl(_) | Self::InvalidHeader { .. } | Self::Encode(_) => {
                TransportErrorKind::InvalidRequest
            }
            Self::PhotoRead { .. } => TransportErrorKind::LocalFile,
            Self::DnsError { .. } => TransportErrorKind::DnsError,
            Self::ConnectionRefused { .. } => TransportErrorKind::ConnectionRefused,
            Self::ConnectionFailed(_) => TransportErrorKind::ConnectionFailed,
            Self::Timeout { .. } => TransportErrorKind::Timeout,
            Self::BodyRead(_) => TransportErrorKind::InvalidResponse,
            Self::Other(_) => TransportErrorKind::Unknown,
        }
    }
}

/// Result type alias for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Port for the PetFriends REST API.
///
/// Implementations hold no per-call state: the caller threads the
/// [`AuthKey`] and pet ids from one call to the next. Every operation
/// returns `Ok` for any HTTP status and performs no validation of the
/// values it sends.
pub trait PetStoreApi: Send + Sync {
    /// Requests an API key for the given credentials.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Lists pets in the scope selected by `filter`.
    fn list_pets(
        &self,
        auth_key: &AuthKey,
        filter: &PetFilter,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Creates a pet with a photo read from `photo_path`.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::PhotoRead`] before sending anything if the
    /// photo cannot be read.
    fn create_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo_path: &Path,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Creates a pet without a photo.
    fn create_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Uploads a photo for an existing pet.
    fn set_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &PetId,
        photo_path: &Path,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Replaces the name, type and age of an existing pet.
    fn update_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &PetId,
        fields: &PetFields,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;

    /// Deletes a pet.
    fn delete_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &PetId,
    ) -> impl Future<Output = ClientResult<ApiResponse>> + Send;
}
