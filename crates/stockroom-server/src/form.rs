//! Multipart form decoding.
//!
//! A field may legally appear more than once. Every occurrence is kept, but
//! handlers read fields through [`FormFields::first`] and
//! [`FormFields::first_file`], so only the first value is meaningful.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::{ServerError, ServerResult};

/// A file part from a multipart body.
#[derive(Clone, Debug)]
pub struct FilePart {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Decoded multipart body: repeated text and file fields by name.
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    text: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FilePart>>,
}

impl FormFields {
    /// Drain a multipart stream. Any parse failure is an [`ServerError::Upload`].
    pub async fn from_multipart(mut multipart: Multipart) -> ServerResult<Self> {
        let mut fields = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::Upload(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let is_file = filename.is_some()
                || content_type.as_deref().is_some_and(|ct| !ct.starts_with("text/"));

            if is_file {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::Upload(e.to_string()))?;
                fields.push_file(name, FilePart { filename, content_type, data });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::Upload(e.to_string()))?;
                fields.push_text(name, value);
            }
        }
        Ok(fields)
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.entry(name.into()).or_default().push(value.into());
    }

    pub fn push_file(&mut self, name: impl Into<String>, part: FilePart) {
        self.files.entry(name.into()).or_default().push(part);
    }

    /// First value of a text field.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.text.get(name)?.first().map(String::as_str)
    }

    /// First non-empty file uploaded under `name`. Browsers send an empty
    /// part when no file was chosen.
    pub fn first_file(&self, name: &str) -> Option<&FilePart> {
        self.files.get(name)?.iter().find(|part| !part.data.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, data: &'static [u8]) -> FilePart {
        FilePart {
            filename: Some(name.into()),
            content_type: Some("image/png".into()),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn first_of_repeated_text_field() {
        let mut f = FormFields::default();
        f.push_text("inventory_name", "Lamp");
        f.push_text("inventory_name", "Ignored");
        assert_eq!(f.first("inventory_name"), Some("Lamp"));
        assert_eq!(f.text["inventory_name"].len(), 2);
        assert_eq!(f.first("description"), None);
    }

    #[test]
    fn first_file_skips_empty_parts() {
        let mut f = FormFields::default();
        f.push_file("photo", part("", b""));
        f.push_file("photo", part("a.png", b"png"));
        f.push_file("photo", part("b.png", b"other"));
        let file = f.first_file("photo").unwrap();
        assert_eq!(file.filename.as_deref(), Some("a.png"));
    }

    #[test]
    fn missing_file_is_none() {
        let mut f = FormFields::default();
        f.push_file("photo", part("", b""));
        assert!(f.first_file("photo").is_none());
        assert!(f.first_file("other").is_none());
    }
}
