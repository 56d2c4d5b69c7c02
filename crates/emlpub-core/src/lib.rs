//! emlpub Core - EML metadata mutation kernel
//!
//! This crate provides:
//! - An owned, mutable XML tree for EML documents (parse → mutate → serialize)
//! - Dotted-path resolution over that tree
//! - Best-effort bulk text replacement and fatal package identifier edits
//! - Package identifier revision increments
//! - The error and logging facilities shared by the rest of the workspace

pub mod eml;
pub mod errors;
pub mod logging_facility;

pub use eml::{
    apply_replacements, increment_revision, package_id, set_package_id, Document, EmlPath,
    ReplacementReport, ReplacementSet,
};
pub use errors::{EmlError, ExError, ExErrorKind, Result};
