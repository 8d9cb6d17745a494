//! Response domain types

mod types;

pub use types::{ApiResponse, Payload, StatusCode};
