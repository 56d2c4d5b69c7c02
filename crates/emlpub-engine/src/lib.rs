//! emlpub Engine - Orchestration layer
//!
//! Coordinates the EML kernel with blob storage and the data source:
//! bootstrapping a package's container, picking the latest metadata
//! document and running the publish pipeline.

pub mod commands;

pub use commands::pipe::{initialize_pipe, Pipe, PipeSettings};
pub use commands::publish::{publish_package, PublishOutcome, PublishRequest};
