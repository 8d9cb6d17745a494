//! PetFriends Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod http;

pub use adapters::ReqwestPetFriendsClient;
pub use config::{SettingsEnv, SettingsError, load_settings, load_settings_with};
pub use http::{BodyBuildError, PHOTO_FIELD, build_pet_form, build_photo_form, encode_form};
