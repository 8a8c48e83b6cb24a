//! HTTP bindings of methods.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// HTTP bindings of a method.
///
/// A method may carry several alternative bindings; the first one is the
/// primary binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathInfo {
    /// Alternative bindings, primary first
    pub bindings: Vec<PathBinding>,
    /// Field sent as the request body: `*` for the whole request, a field
    /// name for a single field, `None` for no body
    pub body_field_path: Option<String>,
}

impl PathInfo {
    /// Creates bindings info with a single binding.
    #[must_use]
    pub fn new(binding: PathBinding) -> Self {
        Self {
            bindings: vec![binding],
            body_field_path: None,
        }
    }

    /// Sets the body field path.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_field_path = Some(body.into());
        self
    }

    /// Appends an alternative binding.
    #[must_use]
    pub fn with_binding(mut self, binding: PathBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Returns the primary binding, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&PathBinding> {
        self.bindings.first()
    }
}

/// One concrete HTTP verb, path template, and query-parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBinding {
    /// HTTP verb, e.g. `GET`
    pub verb: String,
    /// Path template
    pub template: PathTemplate,
    /// Names of request fields sent as query parameters
    pub query_parameters: BTreeSet<String>,
}

impl PathBinding {
    /// Creates a binding without query parameters.
    #[must_use]
    pub fn new(verb: impl Into<String>, template: PathTemplate) -> Self {
        Self {
            verb: verb.into(),
            template,
            query_parameters: BTreeSet::new(),
        }
    }

    /// Marks a request field as a query parameter.
    #[must_use]
    pub fn with_query_parameter(mut self, name: impl Into<String>) -> Self {
        self.query_parameters.insert(name.into());
        self
    }

    /// Top-level request field names bound by path variables.
    #[must_use]
    pub fn path_fields(&self) -> BTreeSet<&str> {
        self.template
            .field_paths()
            .filter_map(|path| path.split('.').next())
            .collect()
    }
}

/// An ordered sequence of path segments.
///
/// # Examples
///
/// ```
/// use apigen_core::model::PathTemplate;
///
/// let template = PathTemplate::new()
///     .literal("v1")
///     .field("name")
///     .verb("cancel");
/// assert_eq!(template.field_paths().collect::<Vec<_>>(), vec!["name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTemplate {
    /// Segments in order
    pub segments: Vec<PathSegment>,
}

impl PathTemplate {
    /// Creates an empty template.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends a literal segment.
    #[must_use]
    pub fn literal(mut self, literal: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Literal(literal.into()));
        self
    }

    /// Appends a field-path segment, e.g. `secret.name`.
    #[must_use]
    pub fn field(mut self, path: impl Into<String>) -> Self {
        self.segments.push(PathSegment::FieldPath(path.into()));
        self
    }

    /// Appends the trailing custom verb, e.g. `cancel` for `:cancel`.
    #[must_use]
    pub fn verb(mut self, verb: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Verb(verb.into()));
        self
    }

    /// Iterates over the dotted field paths of all variable segments.
    pub fn field_paths(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::FieldPath(path) => Some(path.as_str()),
            _ => None,
        })
    }
}

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// A literal path component
    Literal(String),
    /// A request field path, dotted for nested fields
    FieldPath(String),
    /// The trailing custom verb
    Verb(String),
}
