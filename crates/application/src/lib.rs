//! PetFriends Application - Ports and scenario use cases
//!
//! This crate defines the application layer with:
//! - The `PetStoreApi` port (the client contract)
//! - Transport error taxonomy
//! - Settings model
//! - Use cases shared by the acceptance scenarios

pub mod error;
pub mod ports;
pub mod settings;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ClientError, ClientResult, PetStoreApi};
pub use settings::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Settings};
pub use use_cases::{EnsureOwnPet, OpenSession};
