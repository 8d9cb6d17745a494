//! Authentication domain types

mod types;

pub use types::{AuthKey, Credentials};
