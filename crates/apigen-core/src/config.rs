//! Configuration surface for the codecs.
//!
//! Codecs are configured with a flat key/value option table. The table is
//! validated up front: any malformed option is a configuration error raised
//! before a single file is produced.
//!
//! # Examples
//!
//! ```
//! use apigen_core::CodecOptions;
//! use std::collections::BTreeMap;
//!
//! let mut options = BTreeMap::new();
//! options.insert("copyright-year".to_string(), "2025".to_string());
//! options.insert(
//!     "package:wkt".to_string(),
//!     "package=google-cloud-wkt,source=google.protobuf".to_string(),
//! );
//!
//! let codec = CodecOptions::from_map(&options).unwrap();
//! assert_eq!(codec.copyright_year, Some(2025));
//! assert_eq!(codec.packages[0].package, "google-cloud-wkt");
//!
//! options.insert("not-for-publication".to_string(), "maybe".to_string());
//! assert!(CodecOptions::from_map(&options).unwrap_err().is_config_error());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const PACKAGE_PREFIX: &str = "package:";

/// Model predicate that activates a package descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsedIf {
    /// At least one service is defined
    Services,
    /// At least one method is a long-running operation
    Lro,
    /// At least one method returns a paginated response
    Pagination,
    /// At least one method is paginated or server-streaming
    Streaming,
}

impl UsedIf {
    /// Returns the option spelling of the predicate.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Lro => "lro",
            Self::Pagination => "pagination",
            Self::Streaming => "streaming",
        }
    }
}

impl fmt::Display for UsedIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsedIf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "services" => Ok(Self::Services),
            "lro" => Ok(Self::Lro),
            "pagination" => Ok(Self::Pagination),
            "streaming" => Ok(Self::Streaming),
            _ => Err(config_error(format!(
                "invalid used-if predicate: '{s}' (expected: services, lro, pagination, or streaming)"
            ))),
        }
    }
}

/// A package descriptor from a `package:<alias>` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOption {
    /// Display name, the `<alias>` part of the option key
    pub alias: String,
    /// Wire package id, e.g. the crate or npm package name
    pub package: String,
    /// Optional local path
    pub path: Option<String>,
    /// Optional version requirement
    pub version: Option<String>,
    /// Source packages whose elements are qualified through this package
    pub sources: Vec<String>,
    /// Enabled features
    pub features: Vec<String>,
    /// Never emitted as a dependency
    pub ignore: bool,
    /// Always emitted as a dependency
    pub force_used: bool,
    /// Emitted iff the model predicate holds
    pub used_if: Option<UsedIf>,
    /// The package has a streaming feature
    pub streaming: bool,
}

impl PackageOption {
    /// Creates a descriptor whose wire package id equals its alias.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            package: alias.clone(),
            alias,
            path: None,
            version: None,
            sources: Vec::new(),
            features: Vec::new(),
            ignore: false,
            force_used: false,
            used_if: None,
            streaming: false,
        }
    }

    /// Parses the comma-separated `key=value` descriptor of `package:<alias>`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` on unknown keys, missing `=`, empty
    /// values, or unparsable booleans.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::{PackageOption, UsedIf};
    ///
    /// let option = PackageOption::parse(
    ///     "lro",
    ///     "package=google-cloud-lro,version=0.1,used-if=lro,streaming=true",
    /// )
    /// .unwrap();
    /// assert_eq!(option.package, "google-cloud-lro");
    /// assert_eq!(option.used_if, Some(UsedIf::Lro));
    /// assert!(option.streaming);
    /// ```
    pub fn parse(alias: &str, descriptor: &str) -> Result<Self> {
        let mut option = Self::new(alias);
        for element in descriptor.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = element.split_once('=').ok_or_else(|| {
                config_error(format!("package:{alias}: expected key=value, got '{element}'"))
            })?;
            let (key, value) = (key.trim(), value.trim());
            if value.is_empty() {
                return Err(config_error(format!("package:{alias}: empty value for '{key}'")));
            }
            match key {
                "package" => option.package = value.to_string(),
                "path" => option.path = Some(value.to_string()),
                "version" => option.version = Some(value.to_string()),
                "source" => option.sources.push(value.to_string()),
                "feature" => option.features.push(value.to_string()),
                "ignore" => option.ignore = parse_bool(&format!("package:{alias}.ignore"), value)?,
                "force-used" => {
                    option.force_used = parse_bool(&format!("package:{alias}.force-used"), value)?;
                }
                "used-if" => option.used_if = Some(value.parse()?),
                "streaming" => {
                    option.streaming = parse_bool(&format!("package:{alias}.streaming"), value)?;
                }
                _ => {
                    return Err(config_error(format!(
                        "package:{alias}: unknown descriptor key '{key}'"
                    )));
                }
            }
        }
        if option.force_used && option.used_if.is_some() {
            return Err(config_error(format!(
                "package:{alias}: force-used and used-if are mutually exclusive"
            )));
        }
        Ok(option)
    }
}

/// Validated codec options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Target module/root path for generated model types
    pub module_path: Option<String>,
    /// Name of the generated package, overriding the derived name
    pub package_name_override: Option<String>,
    /// Version of the generated package
    pub version: String,
    /// Copyright year stamped into generated headers
    pub copyright_year: Option<u16>,
    /// The generated package must not be published
    pub not_for_publication: bool,
    /// Missing fields deserialize to their defaults
    pub deserialize_with_defaults: bool,
    /// Package descriptors, sorted by alias
    pub packages: Vec<PackageOption>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            module_path: None,
            package_name_override: None,
            version: "0.0.0".to_string(),
            copyright_year: None,
            not_for_publication: false,
            deserialize_with_defaults: true,
            packages: Vec::new(),
        }
    }
}

impl CodecOptions {
    /// Validates and converts a raw option table.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` for unknown keys, unparsable values, or
    /// malformed package descriptors.
    pub fn from_map(options: &BTreeMap<String, String>) -> Result<Self> {
        let mut codec = Self::default();
        for (key, value) in options {
            if let Some(alias) = key.strip_prefix(PACKAGE_PREFIX) {
                if alias.is_empty() {
                    return Err(config_error("package option without an alias".to_string()));
                }
                codec.packages.push(PackageOption::parse(alias, value)?);
                continue;
            }
            match key.as_str() {
                "module-path" => codec.module_path = Some(value.clone()),
                "package-name-override" => codec.package_name_override = Some(value.clone()),
                "version" => codec.version.clone_from(value),
                "copyright-year" => codec.copyright_year = Some(parse_year(value)?),
                "not-for-publication" => codec.not_for_publication = parse_bool(key, value)?,
                "deserialize-with-defaults" => {
                    codec.deserialize_with_defaults = parse_bool(key, value)?;
                }
                _ => return Err(config_error(format!("unknown codec option '{key}'"))),
            }
        }
        tracing::debug!(packages = codec.packages.len(), "codec options validated");
        Ok(codec)
    }
}

/// A generator configuration document.
///
/// # Examples
///
/// ```
/// use apigen_core::GeneratorConfig;
///
/// let config = GeneratorConfig::from_toml_str(r#"
/// [general]
/// language = "rust"
///
/// [codec]
/// version = "1.2.0"
/// "package:wkt" = "package=google-cloud-wkt,source=google.protobuf"
/// "#).unwrap();
///
/// assert_eq!(config.general.language.as_deref(), Some("rust"));
/// let codec = config.codec_options().unwrap();
/// assert_eq!(codec.version, "1.2.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Raw codec option table, see [`CodecOptions::from_map`]
    #[serde(default)]
    pub codec: BTreeMap<String, String>,
}

/// The `[general]` table of a generator configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// Output target, e.g. `rust` or `typescript`
    pub language: Option<String>,
}

impl GeneratorConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the document is not valid TOML or does
    /// not match the expected shape.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        toml::from_str(document)
            .map_err(|e| config_error(format!("invalid generator configuration: {e}")))
    }

    /// Validates the `[codec]` table.
    ///
    /// # Errors
    ///
    /// See [`CodecOptions::from_map`].
    pub fn codec_options(&self) -> Result<CodecOptions> {
        CodecOptions::from_map(&self.codec)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(config_error(format!(
            "cannot convert '{key}' value '{value}' to a boolean"
        ))),
    }
}

fn parse_year(value: &str) -> Result<u16> {
    match value.parse::<u16>() {
        Ok(year) if value.len() == 4 => Ok(year),
        _ => Err(config_error(format!("invalid copyright year: '{value}'"))),
    }
}

fn config_error(message: String) -> Error {
    Error::ConfigError { message }
}
