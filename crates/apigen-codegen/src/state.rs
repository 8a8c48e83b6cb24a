//! Per-run resolution state.
//!
//! A generation run threads one [`ResolveState`] through every resolver by
//! mutable reference. It records which external packages were referenced,
//! feeding the dependency resolver, and the diagnostics raised by malformed
//! or unsupported model elements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a non-fatal resolution problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The field uses a type the targets cannot express, e.g. groups
    UnsupportedType,
    /// A referenced message or enum is not in the model
    UnresolvedType,
    /// A source package has no package descriptor
    UnknownPackage,
    /// A path template names a field the request does not have
    UnknownPathField,
}

impl DiagnosticKind {
    /// Stable spelling used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedType => "unsupported-type",
            Self::UnresolvedType => "unresolved-type",
            Self::UnknownPackage => "unknown-package",
            Self::UnknownPathField => "unknown-path-field",
        }
    }
}

/// A problem found while resolving one model element.
///
/// Diagnostics never stop a run. The element renders with an empty or
/// best-effort value and the diagnostic is surfaced in the generation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// ID of the offending element, or the offending package name
    pub subject: String,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.as_str(), self.subject, self.message)
    }
}

/// Accumulator shared by the resolvers of one generation run.
///
/// # Examples
///
/// ```
/// use apigen_codegen::{DiagnosticKind, ResolveState};
///
/// let mut state = ResolveState::new();
/// state.mark_used("wkt");
/// state.diagnose(DiagnosticKind::UnsupportedType, ".test.Fake.legacy", "group fields are not supported");
///
/// assert!(state.is_used("wkt"));
/// assert_eq!(state.diagnostics().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolveState {
    used_packages: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ResolveState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the package with display name `name` was referenced.
    pub fn mark_used(&mut self, name: &str) {
        if !self.used_packages.contains(name) {
            tracing::debug!(package = name, "package referenced");
            self.used_packages.insert(name.to_string());
        }
    }

    /// Returns `true` if the package was referenced during this run.
    #[must_use]
    pub fn is_used(&self, name: &str) -> bool {
        self.used_packages.contains(name)
    }

    /// Display names of every referenced package, sorted.
    #[must_use]
    pub const fn used_packages(&self) -> &BTreeSet<String> {
        &self.used_packages
    }

    /// Logs and records a diagnostic.
    pub fn diagnose(&mut self, kind: DiagnosticKind, subject: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(kind = kind.as_str(), subject, "{message}");
        self.diagnostics.push(Diagnostic {
            kind,
            subject: subject.to_string(),
            message,
        });
    }

    /// Diagnostics in the order they were raised.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the state, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
