//! Rendered output of a generation run.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::{GeneratedCode, GeneratedFile};
//!
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile {
//!     path: "src/lib.rs".to_string(),
//!     content: "pub mod model;".to_string(),
//! });
//!
//! assert_eq!(code.file_count(), 1);
//! assert!(code.file("src/lib.rs").is_some());
//! ```

use apigen_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Every file rendered for one package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Rendered files in template order
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates an empty collection.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a rendered file.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of rendered files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns an iterator over the rendered files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Looks up a rendered file by its relative path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the output directory
    pub path: String,
    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Writes the file below `out_dir`, creating parent directories, and
    /// returns the written path.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if a directory or the file cannot be written.
    pub fn write_under(&self, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &self.content).map_err(|source| Error::IoError {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = self.content.len(), "wrote file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_under_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            path: "src/model.rs".to_string(),
            content: "pub struct Secret;\n".to_string(),
        };

        let path = file.write_under(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("src/model.rs"));
        let written = fs::read_to_string(dir.path().join("src/model.rs")).unwrap();
        assert_eq!(written, "pub struct Secret;\n");
    }

    #[test]
    fn test_file_lookup() {
        let code = GeneratedCode {
            files: vec![GeneratedFile {
                path: "package.json".to_string(),
                content: "{}".to_string(),
            }],
        };
        assert!(code.file("package.json").is_some());
        assert!(code.file("src/index.ts").is_none());
    }
}
