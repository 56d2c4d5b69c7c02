use crate::api::{invalid_package_number, package_number};
use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use emlpub_core::errors::{ExError, ExErrorKind};
use emlpub_core_types::RequestId;
use emlpub_engine::{initialize_pipe, PublishOutcome, PublishRequest};
use emlpub_store::sql::read_sql_from_file;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Parameters accepted in the query string or, for POST, a JSON body.
/// Query string values win.
#[derive(Debug, Default, Deserialize)]
pub struct PublishParams {
    #[serde(default, deserialize_with = "string_or_number")]
    pub package_number: Option<String>,
    #[serde(rename = "sqlPath")]
    pub sql_path: Option<String>,
    pub bump_revision: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub message: String,
    pub package_number: String,
    pub package_id: String,
    pub data_url: String,
    pub xml_url: String,
    pub published_xml_url: String,
    pub skipped_paths: Vec<String>,
}

impl From<PublishOutcome> for PublishResponse {
    fn from(outcome: PublishOutcome) -> Self {
        Self {
            message: "publish package execution complete".to_string(),
            package_number: outcome.package_number,
            package_id: outcome.package_id,
            data_url: outcome.data_url,
            xml_url: outcome.source_xml_url,
            published_xml_url: outcome.published_xml_url,
            skipped_paths: outcome.replacements.skipped,
        }
    }
}

/// Run the publish pipeline for one package
pub async fn publish_package(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PublishParams>,
    body: Option<Json<PublishParams>>,
) -> Result<Response> {
    let request_id = request_id(&headers);
    let body = body.map(|Json(params)| params).unwrap_or_default();

    let Some(package_number) =
        package_number(query.package_number.as_deref().or(body.package_number.as_deref()))
    else {
        return Ok(invalid_package_number());
    };

    let requested_sql = query.sql_path.or(body.sql_path).map(PathBuf::from);
    let from_request = requested_sql.is_some();
    let sql_path = requested_sql
        .or_else(|| state.config.pipeline.query_path.clone())
        .ok_or_else(|| {
            ServiceError::InvalidRequest(
                "no sqlPath given and no default query configured".to_string(),
            )
        })?;
    let bump_revision = query.bump_revision.or(body.bump_revision).unwrap_or(false);

    tracing::info!(
        request_id = %request_id,
        package_number = %package_number,
        sql_path = %sql_path.display(),
        bump_revision,
        "publish requested"
    );

    let settings = state.pipe_settings(&package_number);
    let csv_name = state.config.pipeline.csv_name.clone();

    let sql_text = tokio::task::spawn_blocking({
        let sql_path = sql_path.clone();
        move || read_sql_from_file(sql_path)
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))?
    .map_err(|e| query_file_error(e, &sql_path, from_request, request_id.clone()))?;

    // Pipeline is synchronous file and SQLite work
    let outcome = tokio::task::spawn_blocking(move || -> emlpub_store::Result<PublishOutcome> {
        let pipe = initialize_pipe(&settings)?;
        let request = PublishRequest::new(sql_text)
            .with_csv_name(csv_name)
            .with_bump_revision(bump_revision);
        emlpub_engine::publish_package(&pipe, &request)
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))?
    .map_err(|e| e.with_request_id(request_id))?;

    Ok(Json(PublishResponse::from(outcome)).into_response())
}

/// A query file the caller named is their input; one from config is ours.
fn query_file_error(
    err: ExError,
    sql_path: &Path,
    from_request: bool,
    request_id: RequestId,
) -> ServiceError {
    if from_request && err.kind() == ExErrorKind::Io {
        ServiceError::InvalidRequest(format!(
            "sqlPath '{}' could not be read: {}",
            sql_path.display(),
            err.message()
        ))
    } else {
        ServiceError::from(err.with_request_id(request_id))
    }
}

fn request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| RequestId::from_string(v.to_string()))
        .unwrap_or_default()
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    }))
}
