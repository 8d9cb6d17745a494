//! Use cases shared by the acceptance scenarios.

mod ensure_own_pet;
mod open_session;


pub use ensure_own_pet::EnsureOwnPet;
pub use open_session::OpenSession;

use petfriends_domain::ApiResponse;

use crate::error::{ApplicationError, ApplicationResult};

/// Passes a 2xx response through and turns anything else into
/// [`ApplicationError::UnexpectedStatus`].
fn require_success(operation: &'static str, response: ApiResponse) -> ApplicationResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApplicationError::UnexpectedStatus {
            operation,
            status: response.status,
            body: response.payload.excerpt(),
        })
    }
}
