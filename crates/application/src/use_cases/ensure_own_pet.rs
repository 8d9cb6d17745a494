//! Ensure own pet use case.

use petfriends_domain::{AuthKey, Pet, PetFields, PetFilter, PetList};
use tracing::info;

use super::require_success;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::PetStoreApi;

/// Use case for getting a pet owned by the caller, creating one if needed.
///
/// Scenarios that delete, update or re-photograph "my first pet" start from
/// here so they do not depend on leftovers from earlier runs.
pub struct EnsureOwnPet<'a, C: PetStoreApi> {
    client: &'a C,
}

impl<'a, C: PetStoreApi> EnsureOwnPet<'a, C> {
    /// Creates a new `EnsureOwnPet` use case.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Returns the first pet in `my_pets`, creating one from `fallback`
    /// (without a photo) when the list is empty.
    ///
    /// # Errors
    /// - Returns [`ApplicationError::UnexpectedStatus`] if listing or creating fails
    /// - Returns [`ApplicationError::NoOwnPets`] if the list is still empty afterwards
    /// - Returns [`ApplicationError::Client`] on transport failure
    pub async fn execute(&self, auth_key: &AuthKey, fallback: &PetFields) -> ApplicationResult<Pet> {
        if let Some(pet) = self.my_pets(auth_key).await?.first() {
            return Ok(pet.clone());
        }

        info!(name = %fallback.name, "no own pets, creating one");
        let created = self
            .client
            .create_pet_without_photo(auth_key, fallback)
            .await?;
        require_success("create_pet_without_photo", created)?;

        self.my_pets(auth_key)
            .await?
            .first()
            .cloned()
            .ok_or(ApplicationError::NoOwnPets)
    }

    async fn my_pets(&self, auth_key: &AuthKey) -> ApplicationResult<PetList> {
        let response = self.client.list_pets(auth_key, &PetFilter::MyPets).await?;
        Ok(require_success("list_pets", response)?.pet_list()?)
    }
}
