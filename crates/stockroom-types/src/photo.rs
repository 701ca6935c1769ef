use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Longest extension kept on a generated photo filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Filename of a photo stored in the cache directory.
///
/// A `PhotoRef` is always a bare filename: never empty, never containing a
/// path separator, and never `.` or `..`. It can therefore be joined onto the
/// cache directory without escaping it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Generate a fresh, unique filename, keeping `extension` when it is a
    /// plausible file extension.
    pub fn generate(extension: Option<&str>) -> Self {
        let stem = uuid::Uuid::now_v7().simple().to_string();
        match extension.and_then(sanitize_extension) {
            Some(ext) => Self(format!("{stem}.{ext}")),
            None => Self(stem),
        }
    }

    /// Validate an existing filename.
    pub fn parse(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(TypeError::InvalidPhotoRef(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lowercased extension, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.0.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Image MIME type guessed from the extension. Unknown extensions fall
    /// back to `image/jpeg`.
    pub fn content_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("svg") => "image/svg+xml",
            _ => "image/jpeg",
        }
    }
}

/// Pull a safe extension out of a client-supplied filename or extension.
///
/// Accepts either `"jpg"` or `"holiday.JPG"`; the result is lowercased
/// ASCII alphanumerics only.
fn sanitize_extension(raw: &str) -> Option<String> {
    let ext = raw.rsplit('.').next().unwrap_or(raw);
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.bytes().all(|b| b.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

impl TryFrom<String> for PhotoRef {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhotoRef> for String {
    fn from(value: PhotoRef) -> Self {
        value.0
    }
}

impl fmt::Debug for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhotoRef({})", self.0)
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
