//! Error types for the repository client

use emlpub_core::errors::{ExError, ExErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error: HTTP {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Could not fetch EML from {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty transaction id in repository response")]
    EmptyTransaction,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

impl From<RepositoryError> for ExError {
    fn from(err: RepositoryError) -> Self {
        let kind = match &err {
            RepositoryError::InvalidUrl { .. } => ExErrorKind::InvalidInput,
            _ => ExErrorKind::ExternalService,
        };
        ExError::new(kind)
            .with_op("repository")
            .with_message(err.to_string())
    }
}
