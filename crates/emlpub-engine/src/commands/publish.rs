//! Publish pipeline
//!
//! ## Steps (in order):
//! 1. Export the query result as CSV to `data/<csv_name>.csv` (overwrite)
//! 2. Pick the newest `xml/*.xml` document
//! 3. Point its data table at the uploaded CSV (URL and byte size)
//! 4. Optionally bump the package identifier revision
//! 5. Write the result to `xml/<packageId>.xml` (overwrite)
//!
//! Nothing is written to `xml/` if any step before 5 fails. The CSV upload
//! in step 1 is not rolled back.

use crate::commands::documents::{latest_document, load_document, write_document, DATA_PREFIX};
use crate::commands::pipe::Pipe;
use emlpub_core::eml::{
    apply_replacements, increment_revision, known_paths, package_id, set_package_id,
    ReplacementReport, ReplacementSet,
};
use emlpub_core::errors::{ExError, ExErrorKind};
use emlpub_store::db::fetch_table;
use emlpub_store::errors::Result;
use serde::Serialize;
use std::time::Instant;

/// Name used for the exported CSV when none is configured
pub const DEFAULT_CSV_NAME: &str = "genetics-data";

/// What to publish
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Query whose result set becomes the package's data table
    pub query: String,
    /// Blob stem of the CSV; stored as `data/<csv_name>.csv`
    pub csv_name: String,
    /// Increment the revision of the package identifier before writing
    pub bump_revision: bool,
}

impl PublishRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            csv_name: DEFAULT_CSV_NAME.to_string(),
            bump_revision: false,
        }
    }

    pub fn with_csv_name(mut self, csv_name: impl Into<String>) -> Self {
        self.csv_name = csv_name.into();
        self
    }

    pub fn with_bump_revision(mut self, bump: bool) -> Self {
        self.bump_revision = bump;
        self
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub package_number: String,
    pub data_url: String,
    pub csv_size: usize,
    pub row_count: usize,
    /// Document the edits started from
    pub source_xml: String,
    pub source_xml_url: String,
    /// Document that was written
    pub published_xml: String,
    pub published_xml_url: String,
    pub package_id: String,
    pub replacements: ReplacementReport,
}

/// Run the publish pipeline for one package.
pub fn publish_package(pipe: &Pipe, request: &PublishRequest) -> Result<PublishOutcome> {
    let start = Instant::now();
    emlpub_core::log_op_start!(
        "publish_package",
        package_number = pipe.package_number(),
        bump_revision = request.bump_revision
    );

    match run_pipeline(pipe, request) {
        Ok(outcome) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            emlpub_core::log_op_end!(
                "publish_package",
                duration_ms = duration_ms,
                package_id = outcome.package_id.as_str(),
                row_count = outcome.row_count,
                skipped = outcome.replacements.skipped.len()
            );
            Ok(outcome)
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            emlpub_core::log_op_error!("publish_package", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn run_pipeline(pipe: &Pipe, request: &PublishRequest) -> Result<PublishOutcome> {
    let container = pipe.container();
    let csv_blob = csv_blob_name(&request.csv_name)?;

    // 1. data export
    let table = fetch_table(pipe.connection(), &request.query)?;
    let csv = table.to_csv();
    let data_url = container.upload(&csv_blob, csv.as_bytes(), true)?;
    tracing::debug!(
        op = "publish_package",
        blob = csv_blob.as_str(),
        row_count = table.len(),
        "data exported"
    );

    // 2-3. latest document with data table references updated
    let source = latest_document(container)?;
    let mut doc = load_document(container, &source.name)?;
    let replacements = ReplacementSet::from_pairs([
        (known_paths::CSV_URL, data_url.clone()),
        (known_paths::CSV_SIZE, csv.len().to_string()),
    ])
    .map_err(ExError::from)?;
    let report = apply_replacements(&mut doc, &replacements);

    // 4. revision
    if request.bump_revision {
        let current = package_id(&doc)
            .map_err(|e| ExError::from(e).with_blob(source.name.as_str()))?
            .to_string();
        let next = increment_revision(&current).map_err(ExError::from)?;
        set_package_id(&mut doc, &next).map_err(ExError::from)?;
    }

    // 5. write back
    let (published_xml, published_xml_url) =
        write_document(container, &doc).map_err(|e| e.with_op("publish_package"))?;
    let package_id = package_id(&doc).map_err(ExError::from)?.to_string();

    Ok(PublishOutcome {
        package_number: pipe.package_number().to_string(),
        data_url,
        csv_size: csv.len(),
        row_count: table.len(),
        source_xml_url: container.url(&source.name),
        source_xml: source.name,
        published_xml,
        published_xml_url,
        package_id,
        replacements: report,
    })
}

fn csv_blob_name(csv_name: &str) -> Result<String> {
    let stem = csv_name.trim();
    if stem.is_empty() || stem.contains('/') {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("publish_package")
            .with_message(format!("invalid CSV name '{}'", csv_name)));
    }
    Ok(format!("{}{}.csv", DATA_PREFIX, stem))
}
