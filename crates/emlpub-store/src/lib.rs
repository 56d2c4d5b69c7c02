//! emlpub Store - blob containers and the tabular data source
//!
//! Provides:
//! - `BlobContainer` seam with a filesystem implementation (atomic writes)
//! - SQLite access and query execution into an uninterpreted `Table`
//! - CSV rendering of query results
//! - Loading SQL text from files

pub mod blob;
pub mod db;
pub mod errors;
pub mod sql;
pub mod table;

// Re-export key types
pub use blob::{BlobContainer, BlobEntry, FsBlobService, FsContainer};
pub use errors::Result;
pub use table::Table;
