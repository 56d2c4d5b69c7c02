pub mod eml;
pub mod publish;
pub mod repo;
pub mod revision;
