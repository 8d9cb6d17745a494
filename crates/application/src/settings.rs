//! Client settings

use std::time::Duration;

use petfriends_domain::Credentials;

/// Public PetFriends instance.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru/";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved settings for a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Service root; endpoint paths are appended to it.
    pub base_url: String,
    /// Account used by the scenarios.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Settings {
    /// Creates settings for the default service with the default timeout.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
