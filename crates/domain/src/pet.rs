//! Pet types
//!
//! Pets are created, listed, updated and deleted through the remote
//! service. Identity is the server-assigned [`PetId`].

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned pet identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(String);

impl PetId {
    /// Wraps a raw identifier. Unknown ids are allowed on purpose so that
    /// callers can probe the service with them.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A pet as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Server-assigned identifier.
    pub id: PetId,
    /// Pet name.
    pub name: String,
    /// Free-form animal type (e.g. "mainecoon").
    pub animal_type: String,
    /// Age exactly as the service reports it.
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    /// Encoded photo, absent when the pet has none.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pet_photo: Option<String>,
    /// Creation timestamp as reported by the service.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    /// Owner identifier.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
}

impl Pet {
    /// Returns true if the service stored a photo for this pet.
    #[must_use]
    pub const fn has_photo(&self) -> bool {
        self.pet_photo.is_some()
    }
}

/// Body of the pet listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    /// Pets in the order the service returned them.
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl PetList {
    /// Returns true if a pet with the given id is listed.
    #[must_use]
    pub fn contains(&self, id: &PetId) -> bool {
        self.pets.iter().any(|pet| &pet.id == id)
    }

    /// Returns an iterator over the listed ids.
    pub fn ids(&self) -> impl Iterator<Item = &PetId> {
        self.pets.iter().map(|pet| &pet.id)
    }

    /// Returns the first listed pet.
    #[must_use]
    pub fn first(&self) -> Option<&Pet> {
        self.pets.first()
    }

    /// Returns the number of pets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pets.len()
    }

    /// Returns true if no pets are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }
}

/// Scope selector for the pet listing endpoint.
///
/// Values the client does not know are kept verbatim and left to the
/// service to reject or ignore.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PetFilter {
    /// Every pet in the store (`""`).
    #[default]
    All,
    /// Pets owned by the caller (`"my_pets"`).
    MyPets,
    /// Any other value.
    Other(String),
}

impl PetFilter {
    /// Parses a raw filter value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "" => Self::All,
            "my_pets" => Self::MyPets,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the query value sent to the service.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "",
            Self::MyPets => "my_pets",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editable pet fields sent on create and update.
///
/// Nothing is validated here: a non-numeric age or a name full of special
/// characters reaches the service unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetFields {
    /// Pet name.
    pub name: String,
    /// Animal type.
    pub animal_type: String,
    /// Age, sent as-is.
    pub age: String,
}

impl PetFields {
    /// Creates a field set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }

    /// Returns the fields as `(name, value)` pairs in wire order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("animal_type", self.animal_type.as_str()),
            ("age", self.age.as_str()),
        ]
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

// Empty strings count as absent: the service reports "no photo" as "".
fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
