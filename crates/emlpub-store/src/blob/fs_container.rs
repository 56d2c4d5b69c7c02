//! Filesystem-backed blob containers
//!
//! Layout: `<root>/<container>/<blob name>`; blob name separators become
//! directories. URLs are `<public_base_url>/<container>/<blob name>`.

use crate::blob::atomic::atomic_write;
use crate::blob::{BlobContainer, BlobEntry};
use crate::errors::{
    blob_exists, blob_missing, container_exists, invalid_name, io_error, Result,
};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Hands out containers rooted under one directory
#[derive(Debug, Clone)]
pub struct FsBlobService {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobService {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A handle on the named container; it need not exist yet
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty names or names containing `/`, `\` or `..`.
    pub fn container(&self, name: &str) -> Result<FsContainer> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid_name("container", name, "must be a single path segment"));
        }
        Ok(FsContainer {
            name: name.to_string(),
            dir: self.root.join(name),
            base_url: format!("{}/{}", self.public_base_url, name),
        })
    }
}

/// One container, i.e. one directory below the service root
#[derive(Debug, Clone)]
pub struct FsContainer {
    name: String,
    dir: PathBuf,
    base_url: String,
}

impl FsContainer {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, blob: &str) -> Result<PathBuf> {
        if blob.is_empty() || blob.starts_with('/') || blob.ends_with('/') {
            return Err(invalid_name("blob", blob, "must be a relative file name"));
        }
        let mut path = self.dir.clone();
        for segment in blob.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(invalid_name("blob", blob, "illegal path segment"));
            }
            path.push(segment);
        }
        Ok(path)
    }

    fn collect(&self, dir: &Path, prefix: &str, out: &mut Vec<BlobEntry>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| io_error("list_blobs", e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_blobs", e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| io_error("stat_blob", e))?;
            if metadata.is_dir() {
                self.collect(&path, prefix, out)?;
                continue;
            }

            let name = blob_name(&self.dir, &path);
            if !name.starts_with(prefix) {
                continue;
            }
            let modified = metadata.modified().map_err(|e| io_error("stat_blob", e))?;
            out.push(BlobEntry {
                name,
                last_modified: DateTime::<Utc>::from(modified),
                size: metadata.len(),
            });
        }
        Ok(())
    }
}

fn blob_name(container_dir: &Path, path: &Path) -> String {
    path.strip_prefix(container_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl BlobContainer for FsContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.dir.is_dir())
    }

    fn create(&self) -> Result<()> {
        if self.dir.exists() {
            return Err(container_exists(&self.name));
        }
        fs::create_dir_all(&self.dir).map_err(|e| io_error("create_container", e))?;
        tracing::info!(op = "create_container", container = %self.name, "container created");
        Ok(())
    }

    fn upload(&self, blob: &str, content: &[u8], overwrite: bool) -> Result<String> {
        let path = self.blob_path(blob)?;
        if !overwrite && path.exists() {
            return Err(blob_exists(&self.name, blob));
        }
        atomic_write(&path, content)?;
        tracing::debug!(
            op = "upload_blob",
            container = %self.name,
            blob = blob,
            size = content.len(),
            "blob written"
        );
        Ok(self.url(blob))
    }

    fn download(&self, blob: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(blob)?;
        if !path.is_file() {
            return Err(blob_missing(&self.name, blob));
        }
        fs::read(&path).map_err(|e| io_error("download_blob", e))
    }

    fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>> {
        let mut entries = Vec::new();
        if !self.dir.is_dir() {
            return Ok(entries);
        }
        self.collect(&self.dir, prefix, &mut entries)?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn url(&self, blob: &str) -> String {
        format!("{}/{}", self.base_url, blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emlpub_core::ExErrorKind;
    use tempfile::TempDir;

    fn setup() -> (FsBlobService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = FsBlobService::new(temp_dir.path(), "http://blobs.local/");
        (service, temp_dir)
    }

    #[test]
    fn test_create_then_exists() {
        let (service, _dir) = setup();
        let container = service.container("1047").unwrap();

        assert!(!container.exists().unwrap());
        container.create().unwrap();
        assert!(container.exists().unwrap());

        let err = container.create().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_upload_download_and_url() {
        let (service, _dir) = setup();
        let container = service.container("1047").unwrap();

        let url = container
            .upload("data/genetics-data.csv", b"a,b\n1,2\n", false)
            .unwrap();

        assert_eq!(url, "http://blobs.local/1047/data/genetics-data.csv");
        assert_eq!(
            container.download("data/genetics-data.csv").unwrap(),
            b"a,b\n1,2\n"
        );
    }

    #[test]
    fn test_upload_without_overwrite_refuses_existing() {
        let (service, _dir) = setup();
        let container = service.container("1047").unwrap();

        container.upload("xml/init.txt", b"", false).unwrap();
        let err = container.upload("xml/init.txt", b"x", false).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);

        container.upload("xml/init.txt", b"x", true).unwrap();
        assert_eq!(container.download("xml/init.txt").unwrap(), b"x");
    }

    #[test]
    fn test_download_missing_is_not_found() {
        let (service, _dir) = setup();
        let container = service.container("1047").unwrap();
        let err = container.download("xml/edi.1.1.xml").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.blob(), Some("xml/edi.1.1.xml"));
    }

    #[test]
    fn test_list_filters_by_prefix() {
        let (service, _dir) = setup();
        let container = service.container("1047").unwrap();
        container.upload("xml/init.txt", b"", false).unwrap();
        container.upload("xml/edi.1.1.xml", b"<a/>", false).unwrap();
        container.upload("data/init.txt", b"", false).unwrap();

        let names: Vec<_> = container
            .list("xml/")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["xml/edi.1.1.xml", "xml/init.txt"]);
    }

    #[test]
    fn test_list_of_missing_container_is_empty() {
        let (service, _dir) = setup();
        let container = service.container("9999").unwrap();
        assert!(container.list("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let (service, _dir) = setup();
        assert!(service.container("../etc").is_err());
        assert!(service.container("").is_err());

        let container = service.container("1047").unwrap();
        for bad in ["../x", "/abs", "xml//a", "xml/", "a/./b"] {
            let err = container.upload(bad, b"", true).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{}", bad);
        }
    }
}
