//! HTTP request body builder.
//!
//! This module builds the multipart and form-urlencoded bodies the
//! PetFriends endpoints expect from domain `PetFields` and photo paths.

use std::path::Path;

use petfriends_application::ClientError;
use petfriends_domain::PetFields;
use reqwest::multipart::{Form, Part};

/// Multipart field carrying the photo.
pub const PHOTO_FIELD: &str = "pet_photo";

/// Error type for body building operations.
#[derive(Debug, thiserror::Error)]
pub enum BodyBuildError {
    /// Failed to read file.
    #[error("Failed to read file: {path}: {message}")]
    FileReadError {
        /// Path as given by the caller.
        path: String,
        /// I/O message.
        message: String,
    },

    /// Invalid body configuration.
    #[error("Invalid body configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Encoder message.
        message: String,
    },
}

impl From<BodyBuildError> for ClientError {
    fn from(error: BodyBuildError) -> Self {
        match error {
            BodyBuildError::FileReadError { path, message } => Self::PhotoRead { path, message },
            BodyBuildError::InvalidConfig { message }
            | BodyBuildError::SerializationError { message } => Self::Encode(message),
        }
    }
}

/// Build the multipart form for pet creation.
///
/// Text parts are `name`, `animal_type` and `age`, in that order, followed
/// by the photo part when a path is given.
///
/// # Errors
///
/// Returns [`BodyBuildError::FileReadError`] if the photo cannot be read.
pub async fn build_pet_form(
    fields: &PetFields,
    photo: Option<&Path>,
) -> Result<Form, BodyBuildError> {
    let mut form = fields
        .pairs()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.to_string())
        });

    if let Some(path) = photo {
        form = form.part(PHOTO_FIELD, photo_part(path).await?);
    }

    Ok(form)
}

/// Build a multipart form holding only the photo part.
///
/// # Errors
///
/// Returns [`BodyBuildError::FileReadError`] if the photo cannot be read.
pub async fn build_photo_form(photo: &Path) -> Result<Form, BodyBuildError> {
    Ok(Form::new().part(PHOTO_FIELD, photo_part(photo).await?))
}

/// Encode pet fields as `application/x-www-form-urlencoded`.
///
/// # Errors
///
/// Returns [`BodyBuildError::SerializationError`] if encoding fails.
pub fn encode_form(fields: &PetFields) -> Result<String, BodyBuildError> {
    serde_urlencoded::to_string(&fields.pairs()[..]).map_err(|e| BodyBuildError::SerializationError {
        message: e.to_string(),
    })
}

/// Read a photo into a file part.
async fn photo_part(path: &Path) -> Result<Part, BodyBuildError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| BodyBuildError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo")
        .to_string();

    Part::bytes(content)
        .file_name(filename)
        .mime_str(&photo_mime(path))
        .map_err(|e| BodyBuildError::InvalidConfig {
            message: format!("Invalid MIME type: {e}"),
        })
}

/// Guess the photo MIME type from its extension.
fn photo_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
