use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use emlpub_core::errors::{ExError, ExErrorKind};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Pipeline(#[from] ExError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "ERR_INVALID_INPUT"),
            Self::Pipeline(err) => {
                let status = match err.kind() {
                    ExErrorKind::InvalidInput | ExErrorKind::InvalidPath => StatusCode::BAD_REQUEST,
                    ExErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ExErrorKind::PathNotFound
                    | ExErrorKind::RootNotFound
                    | ExErrorKind::MissingAttribute
                    | ExErrorKind::InvalidRevision
                    | ExErrorKind::XmlParse => StatusCode::UNPROCESSABLE_ENTITY,
                    ExErrorKind::AlreadyExists => StatusCode::CONFLICT,
                    ExErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
                    ExErrorKind::Io
                    | ExErrorKind::Serialization
                    | ExErrorKind::Persistence
                    | ExErrorKind::Config
                    | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code())
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ERR_INTERNAL"),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            tracing::error!(err_code = code, "request failed: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({
            "error": code,
            "message": message,
        });
        if let Self::Pipeline(err) = &self {
            if let Some(request_id) = err.request_id() {
                body["request_id"] = json!(request_id.as_str());
            }
        }

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
