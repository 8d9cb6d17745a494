//! PetFriends Domain - Core types
//!
//! This crate defines the domain model for the PetFriends API client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod pet;
pub mod response;
pub mod transport;

pub use auth::{AuthKey, Credentials};
pub use error::{DomainError, DomainResult};
pub use pet::{Pet, PetFields, PetFilter, PetId, PetList};
pub use response::{ApiResponse, Payload, StatusCode};
pub use transport::TransportErrorKind;
