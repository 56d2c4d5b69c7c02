//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partially written blob

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Temp files are hidden dot-files so container listings skip them
pub(crate) fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.tmp", file_name))
}

/// Atomically write bytes to a file, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_blob_dir", e))?;
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("write_blob_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_blob_temp", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("xml").join("edi.1.2.xml");

        atomic_write(&target, b"<eml:eml/>").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"<eml:eml/>");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("data.csv");

        atomic_write(&target, b"a\n1\n").unwrap();
        atomic_write(&target, b"a\n2\n").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"a\n2\n");
    }

    #[test]
    fn test_temp_name_keeps_dotted_file_names_apart() {
        let a = temp_path_for(Path::new("/c/xml/edi.1.2.xml"));
        let b = temp_path_for(Path::new("/c/xml/edi.1.3.xml"));
        assert_ne!(a, b);
        assert_eq!(a, PathBuf::from("/c/xml/.edi.1.2.xml.tmp"));
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        atomic_write(&temp_dir.path().join("init.txt"), b"").unwrap();

        let leftovers = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
