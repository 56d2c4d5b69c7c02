//! emlpub Repository - client for the data repository's package API
//!
//! Submits EML documents for evaluation, uploads and updates packages and
//! lists revisions. Requests authenticate with HTTP basic auth using the
//! repository's LDAP-style principal.

pub mod client;
pub mod environment;
pub mod error;

pub use client::{EvaluationTicket, PackageRef, RepositoryClient};
pub use environment::{Credentials, Environment};
pub use error::RepositoryError;
