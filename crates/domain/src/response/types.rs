//! Response types
//!
//! Every call to the service yields an [`ApiResponse`]: the HTTP status and
//! the parsed body, always together. A 4xx or 5xx status is data here, not
//! an error; callers decide what counts as success.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthKey;
use crate::error::{DomainError, DomainResult};
use crate::pet::{Pet, PetList};

/// Longest body excerpt carried in error messages.
const EXCERPT_LIMIT: usize = 120;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// `200 OK`.
    pub const OK: Self = Self(200);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns true if this is any error status (4xx or 5xx).
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.0 >= 400 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            413 => "Payload Too Large",
            415 => "Unsupported Media Type",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl PartialEq<u16> for StatusCode {
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

/// Parsed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The body parsed as JSON.
    Json(Value),
    /// The body as text, for anything that is not JSON (including empty).
    Text(String),
}

impl Payload {
    /// Parses a raw body. Bodies that are not JSON are kept as lossy UTF-8
    /// text instead of failing.
    #[must_use]
    pub fn from_bytes(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(body).into_owned()),
            Self::Json,
        )
    }

    /// Returns the JSON value, if the body was JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text, if the body was not JSON.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Returns a top-level field of a JSON object body.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(field))
    }

    /// Returns a top-level string field of a JSON object body.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Renders the body, cut to a bounded length for error messages.
    #[must_use]
    pub fn excerpt(&self) -> String {
        let rendered = self.to_string();
        match rendered.char_indices().nth(EXCERPT_LIMIT) {
            Some((cut, _)) => format!("{}...", &rendered[..cut]),
            None => rendered,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Status and payload of one call, returned together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed body.
    pub payload: Payload,
}

impl ApiResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(status: u16, payload: Payload) -> Self {
        Self {
            status: StatusCode::new(status),
            payload,
        }
    }

    /// Creates a response from a status and a raw body.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        Self::new(status, Payload::from_bytes(body))
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a top-level field of a JSON object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Returns a top-level string field of a JSON object body.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.payload.get_str(name)
    }

    /// Decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotJson`] for text bodies and
    /// [`DomainError::UnexpectedPayload`] when the JSON does not match `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> DomainResult<T> {
        let value = self
            .payload
            .as_json()
            .ok_or_else(|| DomainError::NotJson(self.payload.excerpt()))?;
        T::deserialize(value).map_err(|e| DomainError::UnexpectedPayload(e.to_string()))
    }

    /// Extracts the API key from a successful authentication response.
    ///
    /// Returns `None` for failure statuses and for missing or empty keys.
    #[must_use]
    pub fn auth_key(&self) -> Option<AuthKey> {
        if !self.is_success() {
            return None;
        }
        self.str_field("key")
            .filter(|key| !key.is_empty())
            .map(AuthKey::new)
    }

    /// Decodes the body as a single pet.
    ///
    /// # Errors
    ///
    /// See [`ApiResponse::json_as`].
    pub fn pet(&self) -> DomainResult<Pet> {
        self.json_as()
    }

    /// Decodes the body as a pet listing.
    ///
    /// # Errors
    ///
    /// See [`ApiResponse::json_as`].
    pub fn pet_list(&self) -> DomainResult<PetList> {
        self.json_as()
    }

    /// Splits the response into its status and payload.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, Payload) {
        (self.status, self.payload)
    }
}
