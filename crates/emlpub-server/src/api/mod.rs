pub mod list_handler;
pub mod publish_handler;

pub use list_handler::list_packages;
pub use publish_handler::publish_package;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub async fn health_check() -> &'static str {
    "ok"
}

/// 400 body used by both routes when no package number was supplied
pub(crate) fn invalid_package_number() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": "the package id number is not valid",
            "package_number": null,
        })),
    )
        .into_response()
}

/// A present, non-blank package number
pub(crate) fn package_number(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
