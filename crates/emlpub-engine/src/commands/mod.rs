//! Command orchestration layer.
//!
//! Each command coordinates core EML edits with the store layer.

pub mod documents;
pub mod pipe;
pub mod publish;
