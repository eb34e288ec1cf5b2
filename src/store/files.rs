//! Data file access
//!
//! Files are read whole at session start and overwritten whole on save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Read a whole file, returning `None` when it does not exist
pub fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            debug!(path = %path.display(), bytes = contents.len(), "read data file");
            Ok(Some(contents))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Overwrite a file by writing a sibling temp file and renaming it into place.
///
/// The parent directory is created when missing. This is best-effort: a
/// filesystem without atomic rename may still leave a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote data file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_optional(&dir.path().join("absent.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.txt");

        write_atomic(&path, "B|Apple|95|fruit\n").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("B|Apple|95|fruit\n"));

        write_atomic(&path, "").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some(""));
        assert!(!dir.path().join("nested").join("file.txt.tmp").exists());
    }

    #[test]
    fn test_read_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(dir.path()).is_err());
    }
}
