//! Open session use case.

use petfriends_domain::{AuthKey, Credentials};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::PetStoreApi;

/// Use case for obtaining an API key before running a scenario.
pub struct OpenSession<'a, C: PetStoreApi> {
    client: &'a C,
}

impl<'a, C: PetStoreApi> OpenSession<'a, C> {
    /// Creates a new `OpenSession` use case.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Authenticates and returns the issued key.
    ///
    /// # Errors
    /// - Returns [`ApplicationError::AuthenticationRejected`] if no key was issued
    /// - Returns [`ApplicationError::Client`] on transport failure
    pub async fn execute(&self, credentials: &Credentials) -> ApplicationResult<AuthKey> {
        let response = self.client.authenticate(credentials).await?;
        response
            .auth_key()
            .ok_or(ApplicationError::AuthenticationRejected {
                status: response.status,
            })
    }
}
