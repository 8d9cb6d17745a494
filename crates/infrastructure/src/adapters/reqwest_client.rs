//! PetFriends client implementation using reqwest.
//!
//! This adapter implements the `PetStoreApi` port using the reqwest library.
//! It handles all HTTP communication with the service.

use std::error::Error as _;
use std::path::Path;
use std::time::{Duration, Instant};

use petfriends_application::{ClientError, ClientResult, PetStoreApi, Settings, DEFAULT_TIMEOUT};
use petfriends_domain::{ApiResponse, AuthKey, Credentials, PetFields, PetFilter, PetId};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Url};
use tracing::{debug, warn};

use crate::http::{build_pet_form, build_photo_form, encode_form};

/// Header carrying the account email on the key endpoint.
const EMAIL_HEADER: &str = "email";
/// Header carrying the account password on the key endpoint.
const PASSWORD_HEADER: &str = "password";
/// Header carrying the API key on every other endpoint.
const AUTH_KEY_HEADER: &str = "auth_key";

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// PetFriends client backed by `reqwest::Client`.
///
/// One call sends one request and reads its whole body before returning.
/// Every HTTP status comes back as an [`ApiResponse`]; only transport
/// failures produce a [`ClientError`].
#[derive(Debug, Clone)]
pub struct ReqwestPetFriendsClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestPetFriendsClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "petfriends-api-tests/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("petfriends-api-tests/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ClientError::Other(e.to_string()))?;

        Ok(Self::with_client(client, parse_base_url(base_url)?))
    }

    /// Creates a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be created.
    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        Ok(Self::new(&settings.base_url)?.with_timeout(settings.timeout))
    }

    /// Creates a client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the service root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL from path segments. Segments are
    /// percent-encoded, so pet ids cannot escape their path position.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).timeout(self.timeout)
    }

    fn authorized(&self, method: Method, url: Url, auth_key: &AuthKey) -> ClientResult<RequestBuilder> {
        Ok(self
            .request(method, url)
            .header(AUTH_KEY_HEADER, secret_header(AUTH_KEY_HEADER, auth_key.as_str())?))
    }

    /// Sends a request and turns whatever comes back into an `ApiResponse`.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> ClientResult<ApiResponse> {
        let start = Instant::now();
        let request = request.build().map_err(|e| build_failed(&e))?;
        debug!(
            operation,
            method = %request.method(),
            path = request.url().path(),
            "sending request"
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.map_error(operation, &e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(operation, &e))?;

        debug!(
            operation,
            status,
            bytes = body.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "received response"
        );

        Ok(ApiResponse::from_body(status, &body))
    }

    /// Maps reqwest errors to `ClientError`.
    fn map_error(&self, operation: &'static str, error: &reqwest::Error) -> ClientError {
        let mapped = classify(error, self.timeout);
        warn!(operation, kind = mapped.kind().as_str(), error = %mapped, "request failed");
        mapped
    }

    async fn send_multipart(
        &self,
        operation: &'static str,
        url: Url,
        auth_key: &AuthKey,
        form: Form,
    ) -> ClientResult<ApiResponse> {
        let request = self.authorized(Method::POST, url, auth_key)?.multipart(form);
        self.send(operation, request).await
    }
}

impl PetStoreApi for ReqwestPetFriendsClient {
    async fn authenticate(&self, credentials: &Credentials) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "key"])?;
        let request = self
            .request(Method::GET, url)
            .header(EMAIL_HEADER, secret_header(EMAIL_HEADER, credentials.email())?)
            .header(
                PASSWORD_HEADER,
                secret_header(PASSWORD_HEADER, credentials.password())?,
            );
        self.send("authenticate", request).await
    }

    async fn list_pets(&self, auth_key: &AuthKey, filter: &PetFilter) -> ClientResult<ApiResponse> {
        let mut url = self.endpoint(&["api", "pets"])?;
        url.query_pairs_mut().append_pair("filter", filter.as_str());
        let request = self.authorized(Method::GET, url, auth_key)?;
        self.send("list_pets", request).await
    }

    async fn create_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo_path: &Path,
    ) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "pets"])?;
        let form = build_pet_form(fields, Some(photo_path)).await?;
        self.send_multipart("create_pet", url, auth_key, form).await
    }

    async fn create_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "create_pet_simple"])?;
        let form = build_pet_form(fields, None).await?;
        self.send_multipart("create_pet_without_photo", url, auth_key, form)
            .await
    }

    async fn set_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &PetId,
        photo_path: &Path,
    ) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "pets", "set_photo", pet_id.as_str()])?;
        let form = build_photo_form(photo_path).await?;
        self.send_multipart("set_pet_photo", url, auth_key, form).await
    }

    async fn update_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &PetId,
        fields: &PetFields,
    ) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "pets", pet_id.as_str()])?;
        let body = encode_form(fields)?;
        let request = self
            .authorized(Method::PUT, url, auth_key)?
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        self.send("update_pet", request).await
    }

    async fn delete_pet(&self, auth_key: &AuthKey, pet_id: &PetId) -> ClientResult<ApiResponse> {
        let url = self.endpoint(&["api", "pets", pet_id.as_str()])?;
        let request = self.authorized(Method::DELETE, url, auth_key)?;
        self.send("delete_pet", request).await
    }
}

/// Parses the service root, making sure it ends with `/` so endpoint
/// segments are appended rather than replacing the last one.
fn parse_base_url(base_url: &str) -> ClientResult<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{e}: {base_url}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(format!("{base_url} cannot be a base")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builds a header value that is masked in reqwest's debug output.
fn secret_header(name: &'static str, value: &str) -> ClientResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name,
        message: e.to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Classifies a reqwest error. Connection failures are told apart by their
/// source chain, since reqwest itself only reports "error sending request".
fn classify(error: &reqwest::Error, timeout: Duration) -> ClientError {
    if error.is_timeout() {
        return ClientError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };
    }

    let message = describe(error);

    if error.is_connect() {
        let host = error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("dns") || lowered.contains("resolve") {
            return ClientError::DnsError { host, message };
        }
        if lowered.contains("refused") {
            let port = error
                .url()
                .and_then(Url::port_or_known_default)
                .unwrap_or(80);
            return ClientError::ConnectionRefused { host, port };
        }
        return ClientError::ConnectionFailed(message);
    }

    if error.is_body() || error.is_decode() {
        return ClientError::BodyRead(message);
    }

    if error.is_request() {
        return ClientError::ConnectionFailed(message);
    }

    ClientError::Other(message)
}

/// A request that could not be assembled never left the process.
fn build_failed(error: &reqwest::Error) -> ClientError {
    ClientError::Encode(describe(error))
}

/// Renders an error with its whole source chain.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
