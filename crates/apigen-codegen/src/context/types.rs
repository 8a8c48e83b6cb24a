//! Serializable views rendered by the output templates.
//!
//! Every name, type expression, and documentation line in these views is
//! already resolved by the codec, so templates only lay text out. Fields are
//! never skipped during serialization: strict-mode templates may reference
//! any key, and absent values render as `null`.

use crate::packages::Dependency;
use crate::state::Diagnostic;
use serde::{Deserialize, Serialize};

/// Root context of one generation run.
///
/// # Examples
///
/// ```
/// use apigen_codegen::ApiContext;
///
/// let context = ApiContext {
///     name: "secretmanager".to_string(),
///     title: "Secret Manager API".to_string(),
///     description: "Stores sensitive data.".to_string(),
///     package_name: "google-cloud-secretmanager-v1".to_string(),
///     package_version: "0.1.0".to_string(),
///     source_package: "google.cloud.secretmanager.v1".to_string(),
///     copyright_year: 2025,
///     not_for_publication: false,
///     deserialize_with_defaults: true,
///     docs: vec!["/// Stores sensitive data.".to_string()],
///     default_host: "secretmanager.googleapis.com".to_string(),
///     messages: vec![],
///     enums: vec![],
///     services: vec![],
///     dependencies: vec![],
///     imports: vec![],
///     streaming_feature: None,
///     has_services: false,
///     has_lro: false,
///     has_streamed_responses: false,
///     diagnostics: vec![],
///     additional: serde_json::Value::Null,
/// };
///
/// assert_eq!(context.copyright_year, 2025);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiContext {
    /// Short API name
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Raw API description
    pub description: String,
    /// Name of the generated package
    pub package_name: String,
    /// Version of the generated package
    pub package_version: String,
    /// Source package of the API
    pub source_package: String,
    /// Year in the license header
    pub copyright_year: u16,
    /// The package must not be published to a registry
    pub not_for_publication: bool,
    /// Missing fields deserialize to their default value
    pub deserialize_with_defaults: bool,
    /// Formatted API description
    pub docs: Vec<String>,
    /// Default host of the first service, empty without services
    pub default_host: String,
    /// Top-level messages in declaration order
    pub messages: Vec<MessageContext>,
    /// Top-level enums in declaration order
    pub enums: Vec<EnumContext>,
    /// Services in declaration order
    pub services: Vec<ServiceContext>,
    /// Dependencies of the generated package, sorted by name
    pub dependencies: Vec<Dependency>,
    /// External packages referenced by model types, sorted by name
    pub imports: Vec<ImportContext>,
    /// Packages enabling the streaming feature, when the API streams
    pub streaming_feature: Option<Vec<String>>,
    /// At least one service is declared
    pub has_services: bool,
    /// At least one method is a long-running operation
    pub has_lro: bool,
    /// At least one method is paginated or server-streaming
    pub has_streamed_responses: bool,
    /// Problems found while building this context
    pub diagnostics: Vec<Diagnostic>,
    /// Caller-provided values, passed through untouched
    pub additional: serde_json::Value,
}

/// An external package referenced by the generated model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContext {
    /// Qualifier used in type expressions
    pub name: String,
    /// Wire package id
    pub package: String,
}

/// A message and its nested types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContext {
    /// Source name
    pub name: String,
    /// Source ID, e.g. `.google.cloud.secretmanager.v1.Secret`
    pub id: String,
    /// Local type name
    pub type_name: String,
    /// Fully qualified type name
    pub qualified_name: String,
    /// Name of the scope holding the nested types
    pub module_name: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Fields outside any oneof, in declaration order
    pub fields: Vec<FieldContext>,
    /// Oneof groups in declaration order
    pub oneofs: Vec<OneOfContext>,
    /// Nested messages, map entries excluded
    pub messages: Vec<Self>,
    /// Nested enums
    pub enums: Vec<EnumContext>,
    /// The nested scope has content
    pub has_nested_types: bool,
    /// The message is a paginated response
    pub is_pageable_response: bool,
}

/// A message field.
///
/// # Examples
///
/// ```
/// use apigen_codegen::FieldContext;
///
/// let field = FieldContext {
///     name: "page_size".to_string(),
///     field_name: "page_size".to_string(),
///     json_name: "pageSize".to_string(),
///     field_type: "i32".to_string(),
///     docs: vec![],
///     optional: false,
///     repeated: false,
///     is_map: false,
///     as_string: false,
/// };
///
/// assert_eq!(field.json_name, "pageSize");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldContext {
    /// Source name
    pub name: String,
    /// Member name in the target language
    pub field_name: String,
    /// Wire name in JSON payloads
    pub json_name: String,
    /// Full type expression
    pub field_type: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Optional presence
    pub optional: bool,
    /// Repeated cardinality
    pub repeated: bool,
    /// The field is a map
    pub is_map: bool,
    /// 64-bit integer carried as a JSON string
    pub as_string: bool,
}

/// A oneof group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneOfContext {
    /// Source name
    pub name: String,
    /// Member name of the group in its message
    pub field_name: String,
    /// Local type name of the group
    pub type_name: String,
    /// Fully qualified type name of the group
    pub qualified_name: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Alternatives in declaration order
    pub variants: Vec<VariantContext>,
}

/// One alternative of a oneof group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantContext {
    /// Source field name
    pub name: String,
    /// Variant name
    pub variant_name: String,
    /// Member name in the target language
    pub field_name: String,
    /// Wire name in JSON payloads
    pub json_name: String,
    /// Type expression of the alternative
    pub field_type: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// 64-bit integer carried as a JSON string
    pub as_string: bool,
}

/// An enum and its values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumContext {
    /// Source name
    pub name: String,
    /// Source ID
    pub id: String,
    /// Local type name
    pub type_name: String,
    /// Fully qualified type name
    pub qualified_name: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Values in declaration order
    pub values: Vec<EnumValueContext>,
}

/// An enum value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValueContext {
    /// Source name, also the wire name
    pub name: String,
    /// Constant name in the target language
    pub const_name: String,
    /// Wire number
    pub number: i32,
    /// Formatted documentation
    pub docs: Vec<String>,
}

/// A service and its methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContext {
    /// Source name
    pub name: String,
    /// Source ID
    pub id: String,
    /// Client type name
    pub type_name: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Default host, e.g. `secretmanager.googleapis.com`
    pub default_host: String,
    /// Methods in declaration order
    pub methods: Vec<MethodContext>,
}

/// A service method and its HTTP mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodContext {
    /// Source name
    pub name: String,
    /// Source ID
    pub id: String,
    /// Method name in the target language
    pub method_name: String,
    /// Formatted documentation
    pub docs: Vec<String>,
    /// Fully qualified request type
    pub request_type: String,
    /// Fully qualified response type
    pub response_type: String,
    /// HTTP verb of the primary binding
    pub http_verb: String,
    /// Path format string with one placeholder per path variable
    pub path_format: String,
    /// One accessor expression per path placeholder
    pub path_args: Vec<String>,
    /// Statements adding the query parameters
    pub query_params: Vec<QueryParamContext>,
    /// Expression of the request body, when the binding sends one
    pub body: Option<String>,
    /// Long-running operation details
    pub lro: Option<LroContext>,
    /// The response is paginated
    pub is_pageable: bool,
    /// The response is streamed by the server
    pub server_streaming: bool,
}

/// A query parameter of a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParamContext {
    /// Wire name
    pub name: String,
    /// Statement adding the parameter to the request
    pub statement: String,
}

/// Result types of a long-running operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LroContext {
    /// Fully qualified type of the final response
    pub response_type: String,
    /// Fully qualified type of the progress metadata
    pub metadata_type: String,
}
