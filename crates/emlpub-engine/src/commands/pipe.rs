//! Package pipe bootstrap
//!
//! A pipe binds one package number to its blob container and to the
//! database the package's data is exported from.

use emlpub_core::errors::{ExError, ExErrorKind};
use emlpub_store::errors::Result;
use emlpub_store::{db, BlobContainer, FsBlobService};
use rusqlite::Connection;
use std::path::PathBuf;

/// Placeholder blobs written into a freshly created container
pub const BOOTSTRAP_BLOBS: [&str; 2] = ["xml/init.txt", "data/init.txt"];

/// Everything needed to open a pipe
#[derive(Debug, Clone)]
pub struct PipeSettings {
    pub package_number: String,
    pub storage_root: PathBuf,
    pub public_base_url: String,
    pub database_path: PathBuf,
}

/// An opened package: its container and its data source
pub struct Pipe {
    package_number: String,
    container: Box<dyn BlobContainer>,
    conn: Connection,
}

impl std::fmt::Debug for Pipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe")
            .field("package_number", &self.package_number)
            .field("container", &self.container.name())
            .finish_non_exhaustive()
    }
}

impl Pipe {
    /// Assemble a pipe from an already opened container and connection,
    /// bootstrapping the container if needed
    pub fn from_parts(
        package_number: impl Into<String>,
        container: Box<dyn BlobContainer>,
        conn: Connection,
    ) -> Result<Self> {
        let package_number = package_number.into();
        validate_package_number(&package_number)?;
        ensure_container(container.as_ref())?;
        Ok(Self {
            package_number,
            container,
            conn,
        })
    }

    pub fn package_number(&self) -> &str {
        &self.package_number
    }

    pub fn container(&self) -> &dyn BlobContainer {
        self.container.as_ref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Open the container named by the package number (creating and seeding it
/// on first use) and the package database.
///
/// # Errors
///
/// `InvalidInput` for an empty package number; store errors otherwise.
pub fn initialize_pipe(settings: &PipeSettings) -> Result<Pipe> {
    validate_package_number(&settings.package_number)?;

    let service = FsBlobService::new(&settings.storage_root, &settings.public_base_url);
    let container = service.container(&settings.package_number)?;
    let conn = db::open(&settings.database_path)?;

    Pipe::from_parts(settings.package_number.clone(), Box::new(container), conn)
}

fn validate_package_number(package_number: &str) -> Result<()> {
    if package_number.trim().is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("initialize_pipe")
            .with_message("package number is empty"));
    }
    Ok(())
}

fn ensure_container(container: &dyn BlobContainer) -> Result<()> {
    if container.exists()? {
        return Ok(());
    }
    container.create()?;
    for blob in BOOTSTRAP_BLOBS {
        container.upload(blob, b"", true)?;
    }
    tracing::info!(
        op = "initialize_pipe",
        package_number = container.name(),
        "container bootstrapped"
    );
    Ok(())
}
