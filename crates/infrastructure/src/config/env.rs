//! Environment-backed settings.

use std::path::Path;
use std::time::Duration;

use petfriends_application::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Settings};
use petfriends_domain::Credentials;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Environment keys read by [`load_settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEnv {
    /// Service root URL.
    BaseUrl,
    /// Account email.
    Email,
    /// Account password.
    Password,
    /// Per-request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Path to an optional YAML settings file.
    SettingsFile,
}

impl SettingsEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PETFRIENDS_BASE_URL",
            Self::Email => "PETFRIENDS_EMAIL",
            Self::Password => "PETFRIENDS_PASSWORD",
            Self::TimeoutSeconds => "PETFRIENDS_TIMEOUT_SECS",
            Self::SettingsFile => "PETFRIENDS_SETTINGS",
        }
    }
}

/// Settings loading errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A variable was set to something that is not UTF-8.
    #[error("{name} must be valid UTF-8")]
    InvalidUtf8 {
        /// Variable name.
        name: &'static str,
    },

    /// A variable or file value was blank.
    #[error("{name} must not be empty")]
    Empty {
        /// Setting name.
        name: &'static str,
    },

    /// A required setting was not provided anywhere.
    #[error("missing required setting {name}")]
    Missing {
        /// Setting name.
        name: &'static str,
    },

    /// The timeout was not a positive integer.
    #[error("{name} must be a positive integer number of seconds, got `{value}`")]
    InvalidTimeout {
        /// Setting name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// The base URL did not parse.
    #[error("invalid base URL `{value}`: {message}")]
    InvalidBaseUrl {
        /// Raw value.
        value: String,
        /// Parser message.
        message: String,
    },

    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {message}")]
    FileRead {
        /// File path.
        path: String,
        /// I/O message.
        message: String,
    },

    /// The settings file is not valid YAML or has unknown keys.
    #[error("failed to parse settings file {path}: {message}")]
    FileParse {
        /// File path.
        path: String,
        /// Parser message.
        message: String,
    },
}

/// Shape of the optional YAML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    base_url: Option<String>,
    email: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
}

/// Loads settings from the process environment.
///
/// # Errors
///
/// See [`load_settings_with`].
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_with(read_env_strict)
}

/// Loads settings using `lookup` to read variables.
///
/// Precedence per value: environment, then the file named by
/// `PETFRIENDS_SETTINGS`, then the built-in default. Email and password
/// have no default.
///
/// # Errors
///
/// Returns an error when a value is blank or malformed, when the settings
/// file cannot be read or parsed, or when credentials are missing.
pub fn load_settings_with<F>(lookup: F) -> Result<Settings, SettingsError>
where
    F: Fn(&'static str) -> Result<Option<String>, SettingsError>,
{
    let read = |key: SettingsEnv| -> Result<Option<String>, SettingsError> {
        let name = key.as_str();
        match lookup(name)? {
            Some(value) if value.trim().is_empty() => Err(SettingsError::Empty { name }),
            other => Ok(other),
        }
    };

    let file = match read(SettingsEnv::SettingsFile)? {
        Some(path) => read_settings_file(Path::new(&path))?,
        None => SettingsFile::default(),
    };

    let base_url = match read(SettingsEnv::BaseUrl)? {
        Some(value) => value,
        None => nonempty_file_value("base_url", file.base_url)?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    };
    validate_base_url(&base_url)?;

    let email = read(SettingsEnv::Email)?
        .map_or_else(|| nonempty_file_value("email", file.email), |v| Ok(Some(v)))?
        .ok_or(SettingsError::Missing {
            name: SettingsEnv::Email.as_str(),
        })?;
    let password = read(SettingsEnv::Password)?
        .map_or_else(|| nonempty_file_value("password", file.password), |v| Ok(Some(v)))?
        .ok_or(SettingsError::Missing {
            name: SettingsEnv::Password.as_str(),
        })?;

    let timeout = match read(SettingsEnv::TimeoutSeconds)? {
        Some(raw) => parse_timeout_seconds(SettingsEnv::TimeoutSeconds.as_str(), &raw)?,
        None => match file.timeout_secs {
            Some(0) => {
                return Err(SettingsError::InvalidTimeout {
                    name: "timeout_secs",
                    value: "0".to_string(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        },
    };

    debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "settings loaded");

    Ok(Settings::new(Credentials::new(email, password))
        .with_base_url(base_url)
        .with_timeout(timeout))
}

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
fn read_env_strict(name: &'static str) -> Result<Option<String>, SettingsError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| SettingsError::InvalidUtf8 { name })
    })
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
        path: display.clone(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| SettingsError::FileParse {
        path: display,
        message: e.to_string(),
    })
}

fn nonempty_file_value(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<String>, SettingsError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(SettingsError::Empty { name }),
        other => Ok(other),
    }
}

fn validate_base_url(value: &str) -> Result<(), SettingsError> {
    let url = Url::parse(value).map_err(|e| SettingsError::InvalidBaseUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SettingsError::InvalidBaseUrl {
            value: value.to_string(),
            message: "URL cannot be a base".to_string(),
        });
    }
    Ok(())
}

/// Parses a positive timeout value.
fn parse_timeout_seconds(name: &'static str, raw: &str) -> Result<Duration, SettingsError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(SettingsError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}
