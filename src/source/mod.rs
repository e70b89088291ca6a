//! Source artifact access
//!
//! Raw text of the exercise's authored and compiled files, plus the
//! declarative predicates applied to it.

pub mod manifest;
pub mod object_literal;
pub mod pattern;

use std::io;
use std::path::PathBuf;

use crate::common::{Error, Result};

pub use manifest::{FieldAssertion, Manifest, ManifestFormat};
pub use pattern::TextPattern;

/// Read access to raw artifacts
pub trait SourceInspector: Send + Sync {
    /// Text of an artifact, `Ok(None)` when it does not exist
    fn read_text(&self, path: &str) -> Result<Option<String>>;
}

/// Artifacts on disk below an exercise root
#[derive(Debug, Clone)]
pub struct FsSourceInspector {
    root: PathBuf,
}

impl FsSourceInspector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceInspector for FsSourceInspector {
    fn read_text(&self, path: &str) -> Result<Option<String>> {
        let full = self.root.join(path);
        match std::fs::read_to_string(&full) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::FileRead {
                path: full.display().to_string(),
                error: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_absent_not_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let inspector = FsSourceInspector::new(dir.path());
        assert_eq!(
            inspector.read_text("index.html").unwrap().as_deref(),
            Some("<html></html>")
        );
        assert!(inspector.read_text("css/styles.css").unwrap().is_none());
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();

        let inspector = FsSourceInspector::new(dir.path());
        assert!(matches!(inspector.read_text("dist"), Err(Error::FileRead { .. })));
    }
}
