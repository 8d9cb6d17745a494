//! Settings loading.
//!
//! Settings come from `PETFRIENDS_*` environment variables, optionally
//! layered over a YAML file.

mod env;

pub use env::{SettingsEnv, SettingsError, load_settings, load_settings_with};
