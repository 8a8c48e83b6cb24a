//! The per-target codec seam.
//!
//! Every algorithm in this crate (type resolution, documentation formatting,
//! path and query resolution, dependency resolution) is written once against
//! the [`Codec`] trait. A target supplies only its primitives: keyword
//! escaping, scalar type names, wrapper syntax, link and accessor syntax,
//! and its output templates.

use crate::naming;
use crate::query::QueryParameter;
use apigen_core::model::Typez;
use apigen_core::{Api, CodecOptions, Error, PackageOption, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language of a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Rust client crate
    Rust,
    /// TypeScript client package
    TypeScript,
}

impl Target {
    /// Configuration spelling, also the template directory name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rust" => Ok(Self::Rust),
            "typescript" | "ts" => Ok(Self::TypeScript),
            _ => Err(Error::ConfigError {
                message: format!("unsupported language '{s}' (expected: rust or typescript)"),
            }),
        }
    }
}

/// A template and the relative path of the file it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTemplate {
    /// Registered template name
    pub template: &'static str,
    /// Output path relative to the output directory
    pub path: &'static str,
}

/// Target-specific primitives used by the shared resolvers.
///
/// Methods with default bodies encode behavior that most targets share;
/// implementations override them only where their syntax differs.
pub trait Codec: fmt::Debug {
    /// The output language.
    fn target(&self) -> Target;

    /// Validated options of this run.
    fn options(&self) -> &CodecOptions;

    /// Package descriptors: the target defaults merged with configured ones.
    fn packages(&self) -> &[PackageOption];

    /// Finds the package descriptor that maps `source_package`.
    fn package_for_source(&self, source_package: &str) -> Option<&PackageOption> {
        self.packages()
            .iter()
            .find(|p| p.sources.iter().any(|s| s == source_package))
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    /// Escapes `symbol` if it is a reserved word of the target.
    ///
    /// Must be idempotent on its own output.
    fn escape_keyword(&self, symbol: &str) -> String;

    /// `snake_case` with keyword escaping.
    fn to_snake(&self, symbol: &str) -> String {
        naming::to_snake(symbol, |s| self.escape_keyword(s))
    }

    /// `snake_case` without keyword escaping.
    fn to_snake_no_mangling(&self, symbol: &str) -> String {
        naming::to_snake_no_mangling(symbol)
    }

    /// `PascalCase` with keyword escaping.
    fn to_pascal(&self, symbol: &str) -> String {
        naming::to_pascal(symbol, |s| self.escape_keyword(s))
    }

    /// `camelCase` with keyword escaping.
    fn to_camel(&self, symbol: &str) -> String {
        naming::to_camel(symbol, |s| self.escape_keyword(s))
    }

    /// Name of a field or request accessor.
    fn member_name(&self, name: &str) -> String;

    /// Name of a client method.
    fn method_name(&self, name: &str) -> String;

    /// Name of a message, enum, service, or oneof type.
    fn type_name(&self, name: &str) -> String {
        self.to_pascal(name)
    }

    /// Name of the scope holding the nested types of a message.
    fn module_name(&self, message_name: &str) -> String;

    /// Name of an enum value constant.
    fn enum_value_name(&self, name: &str) -> String {
        self.escape_keyword(name)
    }

    /// Separator between scope components in qualified names.
    fn path_separator(&self) -> &'static str;

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    /// Native type of a scalar, `None` for message, enum, and group.
    fn scalar_type(&self, typez: Typez) -> Option<&'static str>;

    /// Display name of the package a scalar type comes from, if any.
    fn scalar_package(&self, _typez: Typez) -> Option<&'static str> {
        None
    }

    /// Map wrapper.
    fn map_of(&self, key: &str, value: &str) -> String;

    /// Repeated-field wrapper.
    fn collection_of(&self, element: &str) -> String;

    /// Optional-field wrapper.
    fn optional_of(&self, inner: &str) -> String;

    /// Indirection wrapper for recursive fields.
    fn indirection_of(&self, inner: &str) -> String;

    /// Type of a oneof member.
    fn oneof_member_of(&self, inner: &str, is_message: bool) -> String;

    /// Root scope of model types. `package` is `None` for the API's own
    /// package, otherwise the qualifier of the mapped external package.
    fn model_qualifier(&self, package: Option<&str>) -> String;

    /// Root scope of client types, see [`Codec::model_qualifier`].
    fn client_qualifier(&self, package: Option<&str>) -> String;

    /// Qualifier used to reference elements of an external package.
    fn package_qualifier(&self, package: &PackageOption) -> String {
        package.alias.replace('-', "_")
    }

    // ------------------------------------------------------------------
    // Documentation
    // ------------------------------------------------------------------

    /// Prefix of every documentation comment line.
    fn comment_prefix(&self) -> &'static str;

    /// Opening fence of a code block that must never be compiled.
    fn no_compile_fence(&self) -> &'static str;

    /// A reference-link definition line.
    fn link_definition(&self, id: &str, target: &str) -> String {
        format!("[{id}]: {target}")
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Name of the request variable in generated method bodies.
    fn request_variable(&self) -> &'static str {
        "req"
    }

    /// Placeholder of the `index`-th path variable in a path format string.
    fn path_placeholder(&self, index: usize) -> String;

    /// Accesses `member` of `expr`.
    fn member_access(&self, expr: &str, member: &str) -> String {
        format!("{expr}.{member}")
    }

    /// Unwraps an optional path component, failing with a
    /// missing-path-parameter error naming `name`.
    fn unwrap_path_parameter(&self, expr: &str, name: &str) -> String;

    /// Converts an enum-typed expression to its wire value.
    fn enum_wire_value(&self, expr: &str) -> String;

    /// Statement adding one query parameter to a request.
    fn query_parameter_expr(&self, parameter: &QueryParameter) -> String;

    // ------------------------------------------------------------------
    // Packaging
    // ------------------------------------------------------------------

    /// Package name derived from the API when no override is configured.
    fn default_package_name(&self, api: &Api) -> String;

    /// Name of the generated package.
    fn package_name(&self, api: &Api) -> String {
        self.options()
            .package_name_override
            .clone()
            .unwrap_or_else(|| self.default_package_name(api))
    }

    /// Templates rendered for this target, in output order.
    fn templates(&self) -> &'static [OutputTemplate];
}

/// Merges configured package descriptors over a target's defaults.
///
/// A configured descriptor replaces the default with the same alias; the
/// result is sorted by alias.
#[must_use]
pub fn merge_packages(defaults: Vec<PackageOption>, configured: &[PackageOption]) -> Vec<PackageOption> {
    let mut merged: Vec<PackageOption> = defaults
        .into_iter()
        .filter(|d| !configured.iter().any(|c| c.alias == d.alias))
        .collect();
    merged.extend(configured.iter().cloned());
    merged.sort_by(|a, b| a.alias.cmp(&b.alias));
    merged
}

/// Builds the codec for `target`.
///
/// # Examples
///
/// ```
/// use apigen_codegen::{codec_for, Target};
/// use apigen_core::CodecOptions;
///
/// let codec = codec_for(Target::Rust, CodecOptions::default());
/// assert_eq!(codec.target(), Target::Rust);
/// assert_eq!(codec.to_snake("type"), "r#type");
/// ```
#[must_use]
pub fn codec_for(target: Target, options: CodecOptions) -> Box<dyn Codec> {
    match target {
        Target::Rust => Box::new(crate::rust::RustCodec::new(options)),
        Target::TypeScript => Box::new(crate::typescript::TypeScriptCodec::new(options)),
    }
}
