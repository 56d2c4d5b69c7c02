use crate::api::{invalid_package_number, package_number};
use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use emlpub_engine::commands::documents::list_documents;
use emlpub_store::{BlobContainer, FsBlobService};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub package_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentInfo {
    pub name: String,
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub package_number: String,
    pub documents: Vec<DocumentInfo>,
}

/// Metadata documents of one package, newest first
pub async fn list_packages(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let Some(package_number) = package_number(params.package_number.as_deref()) else {
        return Ok(invalid_package_number());
    };

    let storage = state.config.storage.clone();
    let number = package_number.clone();
    let documents = tokio::task::spawn_blocking(move || -> emlpub_store::Result<Vec<DocumentInfo>> {
        let container = FsBlobService::new(&storage.root, &storage.public_base_url)
            .container(&number)?;
        if !container.exists()? {
            return Ok(Vec::new());
        }
        Ok(list_documents(&container)?
            .into_iter()
            .map(|entry| DocumentInfo {
                url: container.url(&entry.name),
                name: entry.name,
                last_modified: entry.last_modified,
                size: entry.size,
            })
            .collect())
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))??;

    Ok(Json(ListResponse {
        package_number,
        documents,
    })
    .into_response())
}
