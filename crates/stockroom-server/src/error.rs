use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stockroom_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The request body could not be decoded (bad JSON or form encoding).
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The multipart upload could not be parsed on our side.
    #[error("failed to read upload: {0}")]
    Upload(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Upload(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match &self {
            Self::Store(e) if e.is_not_found() => e.to_string(),
            Self::Store(StoreError::Validation(e)) => e.to_string(),
            _ if status.is_server_error() => status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string(),
            _ => self.to_string(),
        };
        (status, body).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
