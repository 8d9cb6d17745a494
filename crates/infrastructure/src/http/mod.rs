//! HTTP infrastructure utilities.
//!
//! This module provides body building for the form-encoded and multipart
//! requests the service expects.

mod body_builder;

pub use body_builder::{BodyBuildError, PHOTO_FIELD, build_pet_form, build_photo_form, encode_form};
