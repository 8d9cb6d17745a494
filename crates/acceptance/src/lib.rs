//! PetFriends Acceptance - Live scenario harness
//!
//! Shared setup for the scenarios in `tests/live_scenarios.rs`: settings
//! from the environment, a configured client and the photo fixture.

use std::path::PathBuf;

use petfriends_application::{ClientError, Settings};
use petfriends_infrastructure::{ReqwestPetFriendsClient, SettingsError, load_settings};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use petfriends_domain::PetFields;

/// Pet id that does not exist on the service.
pub const MISSING_PET_ID: &str = "9C4AEC87";

/// Errors raised while preparing a live run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Settings could not be loaded.
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),

    /// The client could not be built.
    #[error("client: {0}")]
    Client(#[from] ClientError),
}

/// Everything a scenario needs to talk to the service.
#[derive(Debug, Clone)]
pub struct Harness {
    /// Resolved settings.
    pub settings: Settings,
    /// Client configured from `settings`.
    pub client: ReqwestPetFriendsClient,
}

impl Harness {
    /// Loads settings from the environment and builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error when settings are missing or invalid, or the client
    /// cannot be created.
    pub fn from_env() -> Result<Self, HarnessError> {
        init_tracing();
        let settings = load_settings()?;
        let client = ReqwestPetFriendsClient::from_settings(&settings)?;
        Ok(Self { settings, client })
    }
}

/// Path of the JPEG uploaded by the photo scenarios.
#[must_use]
pub fn photo_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("cat.jpg")
}

/// Field set used by the happy-path scenarios.
#[must_use]
pub fn valid_pet() -> PetFields {
    PetFields::new("Black", "mainecoon", "1")
}

/// Installs a subscriber honouring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
