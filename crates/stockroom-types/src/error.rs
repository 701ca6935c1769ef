use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("inventory name must not be empty")]
    EmptyName,

    #[error("invalid photo reference: {0}")]
    InvalidPhotoRef(String),
}
