//! Error types for apigen.
//!
//! This module provides a single error hierarchy shared by the model, the
//! codecs, and the generator. Only configuration errors and cross-package
//! consistency errors stop a generation run before any output is produced;
//! per-file failures are collected and reported together.
//!
//! # Examples
//!
//! ```
//! use apigen_core::{Error, Result};
//!
//! fn parse_year(value: &str) -> Result<u16> {
//!     value.parse().map_err(|_| Error::ConfigError {
//!         message: format!("invalid copyright year: '{value}'"),
//!     })
//! }
//!
//! let err = parse_year("next year").unwrap_err();
//! assert!(err.is_config_error());
//! assert!(err.is_fatal());
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for apigen.
///
/// All errors in the system use this type, providing consistent error handling
/// across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when a codec option is unknown, malformed, or contradicts
    /// another option. Always raised before any output is produced.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// The model's top-level elements span more than one source package.
    ///
    /// Each generation run produces exactly one package; elements from the
    /// mixin allow-list do not count.
    #[error("Model spans more than one source package: {}", packages.join(", "))]
    MixedPackages {
        /// The offending source packages, sorted
        packages: Vec<String>,
    },

    /// The model violates a structural invariant.
    ///
    /// Raised by `Api::validate` when a map message is malformed.
    #[error("Invalid model: {message}")]
    ModelError {
        /// Description of the violated invariant
        message: String,
    },

    /// Template registration or rendering failed.
    #[error("Template '{template}' failed: {message}")]
    TemplateError {
        /// Name of the template
        template: String,
        /// Description of the failure reported by the template engine
        message: String,
    },

    /// Writing a generated file failed.
    #[error("I/O error on {}: {source}", path.display())]
    IoError {
        /// Path of the file or directory being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// One or more output files failed to render or write.
    ///
    /// The remaining files were still generated.
    #[error("{} file(s) failed to generate:\n{}", failures.len(), join_failures(failures))]
    GenerationFailed {
        /// Every per-file failure of the run, in declaration order
        failures: Vec<FileFailure>,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when a template context or a configuration document cannot be
    /// converted.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "unknown option".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a cross-package consistency error.
    #[must_use]
    pub const fn is_mixed_packages(&self) -> bool {
        matches!(self, Self::MixedPackages { .. })
    }

    /// Returns `true` if this is a model invariant error.
    #[must_use]
    pub const fn is_model_error(&self) -> bool {
        matches!(self, Self::ModelError { .. })
    }

    /// Returns `true` if this is an aggregated per-file failure.
    #[must_use]
    pub const fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailed { .. })
    }

    /// Returns `true` if this error stops a run before any output is produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::Error;
    ///
    /// let err = Error::MixedPackages {
    ///     packages: vec!["a.v1".to_string(), "b.v1".to_string()],
    /// };
    /// assert!(err.is_fatal());
    ///
    /// let err = Error::TemplateError {
    ///     template: "rust/model.rs".to_string(),
    ///     message: "missing field".to_string(),
    /// };
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::MixedPackages { .. } | Self::ModelError { .. }
        )
    }
}

/// A single output file that could not be rendered or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Template identifier that produced (or failed to produce) the file
    pub template: String,
    /// Relative output path
    pub path: String,
    /// Human-readable failure reason
    pub reason: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {}): {}", self.path, self.template, self.reason)
    }
}

fn join_failures(failures: &[FileFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("  {failure}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for apigen operations.
///
/// # Examples
///
/// ```
/// use apigen_core::{Error, Result};
///
/// fn require_name(name: &str) -> Result<&str> {
///     if name.is_empty() {
///         return Err(Error::ModelError {
///             message: "message name cannot be empty".to_string(),
///         });
///     }
///     Ok(name)
/// }
///
/// assert!(require_name("Secret").is_ok());
/// assert!(require_name("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "bad bool".to_string(),
        };
        assert!(err.is_config_error());
        assert!(err.is_fatal());
        assert!(!err.is_generation_failure());
    }

    #[test]
    fn test_mixed_packages_display() {
        let err = Error::MixedPackages {
            packages: vec!["google.cloud.a.v1".to_string(), "google.cloud.b.v1".to_string()],
        };
        assert!(err.is_mixed_packages());
        assert_eq!(
            err.to_string(),
            "Model spans more than one source package: google.cloud.a.v1, google.cloud.b.v1"
        );
    }

    #[test]
    fn test_generation_failed_joins_every_failure() {
        let err = Error::GenerationFailed {
            failures: vec![
                FileFailure {
                    template: "rust/model.rs".to_string(),
                    path: "src/model.rs".to_string(),
                    reason: "boom".to_string(),
                },
                FileFailure {
                    template: "rust/lib.rs".to_string(),
                    path: "src/lib.rs".to_string(),
                    reason: "bang".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 file(s) failed"));
        assert!(text.contains("src/model.rs (from rust/model.rs): boom"));
        assert!(text.contains("src/lib.rs (from rust/lib.rs): bang"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::IoError {
            path: PathBuf::from("out/src/lib.rs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/src/lib.rs"));
        assert!(err.source().is_some());
    }
}
