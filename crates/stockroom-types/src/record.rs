use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::photo::PhotoRef;

/// Opaque identifier of an inventory record.
///
/// Generated ids are UUID v7 strings, so they sort by creation time and do
/// not collide within a store's lifetime. Any string is accepted as a lookup
/// key; unknown ids simply miss.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a new time-ordered record ID (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inventory item.
///
/// Serialized as `{ "id", "name", "description", "photo" }`, with `photo`
/// set to `null` when no photo was uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<PhotoRef>,
}

/// Input for creating a record. The id is assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub description: String,
    pub photo: Option<PhotoRef>,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: PhotoRef) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Reject records without a usable name.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::EmptyName);
        }
        Ok(())
    }

    /// Build the record under a freshly assigned id.
    pub fn into_record(self, id: RecordId) -> InventoryRecord {
        InventoryRecord {
            id,
            name: self.name,
            description: self.description,
            photo: self.photo,
        }
    }
}

/// Partial update of a record's mutable fields.
///
/// Both `None` and an empty string mean "leave unchanged"; a field cannot be
/// cleared through a patch. A whitespace-only name is also ignored, so a
/// patched record keeps a non-blank name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RecordPatch {
    /// Apply the non-empty fields to `record`. Returns `true` if anything changed.
    pub fn apply(&self, record: &mut InventoryRecord) -> bool {
        let mut changed = false;
        if let Some(name) = self.name.as_deref().filter(|v| !v.trim().is_empty()) {
            changed |= record.name != name;
            record.name = name.to_string();
        }
        if let Some(description) = self.description.as_deref().filter(|v| !v.is_empty()) {
            changed |= record.description != description;
            record.description = description.to_string();
        }
        changed
    }
}
