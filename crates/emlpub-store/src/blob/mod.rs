//! Blob storage
//!
//! A package owns one container; blobs inside it are addressed by
//! slash-separated names (`data/genetics-data.csv`, `xml/edi.1047.6.xml`)
//! and each has a public retrieval URL.

mod atomic;
mod fs_container;

pub use fs_container::{FsBlobService, FsContainer};

use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One listed blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobEntry {
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// Operations the pipeline needs from an object-storage container
pub trait BlobContainer: Send + Sync {
    /// Container name (the package number)
    fn name(&self) -> &str;

    fn exists(&self) -> Result<bool>;

    /// Create the container; fails with `AlreadyExists` if present
    fn create(&self) -> Result<()>;

    /// Store `content` under `blob` and return its URL. Without `overwrite`
    /// an existing blob is an `AlreadyExists` error.
    fn upload(&self, blob: &str, content: &[u8], overwrite: bool) -> Result<String>;

    /// Fetch a blob; `NotFound` if absent
    fn download(&self, blob: &str) -> Result<Vec<u8>>;

    /// Blobs whose name starts with `prefix`, ordered by name
    fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>>;

    /// Public retrieval URL of a blob
    fn url(&self, blob: &str) -> String;
}

/// Sort entries newest first; equal timestamps fall back to name, descending
pub fn newest_first(entries: &mut [BlobEntry]) {
    entries.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| b.name.cmp(&a.name))
    });
}
