//! The TypeScript codec.
//!
//! Generates an npm package: model interfaces in `src/model.ts`, one client
//! class per service in `src/client.ts`, and a `package.json`. Nested types
//! live in namespaces named after their parent message, so qualified names
//! are dot-joined (`Secret.State`). External packages are imported under
//! their descriptor alias.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::typescript::TypeScriptCodec;
//! use apigen_codegen::Codec;
//! use apigen_core::CodecOptions;
//!
//! let codec = TypeScriptCodec::new(CodecOptions::default());
//! assert_eq!(codec.member_name("page_size"), "pageSize");
//! assert_eq!(codec.collection_of("string"), "Array<string>");
//! ```

mod keywords;

pub use keywords::escape_keyword;

use crate::codec::{Codec, OutputTemplate, Target, merge_packages};
use crate::query::{Presence, QueryParameter, QueryValue};
use apigen_core::model::Typez;
use apigen_core::{Api, CodecOptions, PackageOption, UsedIf};

const TEMPLATES: &[OutputTemplate] = &[
    OutputTemplate { template: "typescript/package.json", path: "package.json" },
    OutputTemplate { template: "typescript/index.ts", path: "src/index.ts" },
    OutputTemplate { template: "typescript/model.ts", path: "src/model.ts" },
    OutputTemplate { template: "typescript/client.ts", path: "src/client.ts" },
];

/// Converts a scalar field type to its TypeScript type.
///
/// 64-bit integers and bytes travel as JSON strings.
///
/// # Examples
///
/// ```
/// use apigen_codegen::typescript::scalar_to_typescript;
/// use apigen_core::Typez;
///
/// assert_eq!(scalar_to_typescript(Typez::Int32), Some("number"));
/// assert_eq!(scalar_to_typescript(Typez::Int64), Some("string"));
/// assert_eq!(scalar_to_typescript(Typez::Bool), Some("boolean"));
/// assert_eq!(scalar_to_typescript(Typez::Message), None);
/// ```
#[must_use]
pub const fn scalar_to_typescript(typez: Typez) -> Option<&'static str> {
    match typez {
        Typez::Double
        | Typez::Float
        | Typez::Int32
        | Typez::Uint32
        | Typez::Sint32
        | Typez::Fixed32
        | Typez::Sfixed32 => Some("number"),
        Typez::Int64
        | Typez::Uint64
        | Typez::Sint64
        | Typez::Fixed64
        | Typez::Sfixed64
        | Typez::String
        | Typez::Bytes => Some("string"),
        Typez::Bool => Some("boolean"),
        Typez::Message | Typez::Enum | Typez::Group => None,
    }
}

/// Codec producing a TypeScript client package.
#[derive(Debug, Clone)]
pub struct TypeScriptCodec {
    options: CodecOptions,
    packages: Vec<PackageOption>,
}

impl TypeScriptCodec {
    /// Creates the codec, merging configured package descriptors over the
    /// TypeScript defaults.
    #[must_use]
    pub fn new(options: CodecOptions) -> Self {
        let mut gax = PackageOption::new("gax");
        gax.package = "@apigen/gax".to_string();
        gax.version = Some("^0.1.0".to_string());
        gax.used_if = Some(UsedIf::Services);
        gax.streaming = true;

        let mut wkt = PackageOption::new("wkt");
        wkt.package = "@apigen/wkt".to_string();
        wkt.version = Some("^0.1.0".to_string());
        wkt.sources.push("google.protobuf".to_string());

        let packages = merge_packages(vec![gax, wkt], &options.packages);
        Self { options, packages }
    }
}

impl Codec for TypeScriptCodec {
    fn target(&self) -> Target {
        Target::TypeScript
    }

    fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn packages(&self) -> &[PackageOption] {
        &self.packages
    }

    fn escape_keyword(&self, symbol: &str) -> String {
        escape_keyword(symbol)
    }

    fn member_name(&self, name: &str) -> String {
        self.to_camel(name)
    }

    fn method_name(&self, name: &str) -> String {
        self.to_camel(name)
    }

    fn module_name(&self, message_name: &str) -> String {
        self.to_pascal(message_name)
    }

    fn path_separator(&self) -> &'static str {
        "."
    }

    fn scalar_type(&self, typez: Typez) -> Option<&'static str> {
        scalar_to_typescript(typez)
    }

    fn map_of(&self, _key: &str, value: &str) -> String {
        format!("Record<string, {value}>")
    }

    fn collection_of(&self, element: &str) -> String {
        format!("Array<{element}>")
    }

    fn optional_of(&self, inner: &str) -> String {
        format!("{inner} | undefined")
    }

    fn indirection_of(&self, inner: &str) -> String {
        inner.to_string()
    }

    fn oneof_member_of(&self, inner: &str, _is_message: bool) -> String {
        self.optional_of(inner)
    }

    fn model_qualifier(&self, package: Option<&str>) -> String {
        package.unwrap_or_default().to_string()
    }

    fn client_qualifier(&self, package: Option<&str>) -> String {
        package.unwrap_or_default().to_string()
    }

    fn comment_prefix(&self) -> &'static str {
        " *"
    }

    fn no_compile_fence(&self) -> &'static str {
        "```text"
    }

    fn path_placeholder(&self, index: usize) -> String {
        format!("{{{index}}}")
    }

    fn unwrap_path_parameter(&self, expr: &str, name: &str) -> String {
        format!("({expr} ?? missingPathParameter(\"{name}\"))")
    }

    fn enum_wire_value(&self, expr: &str) -> String {
        expr.to_string()
    }

    fn query_parameter_expr(&self, parameter: &QueryParameter) -> String {
        let QueryParameter { name, accessor, .. } = parameter;
        match (parameter.presence, parameter.value) {
            (_, QueryValue::Message) => format!("appendJson(query, \"{name}\", {accessor});"),
            (Presence::Required, _) => format!("query.append(\"{name}\", String({accessor}));"),
            (Presence::Optional, _) => format!(
                "if ({accessor} !== undefined) query.append(\"{name}\", String({accessor}));"
            ),
            (Presence::Repeated, _) => format!(
                "{accessor}?.forEach((v) => query.append(\"{name}\", String(v)));"
            ),
        }
    }

    fn default_package_name(&self, api: &Api) -> String {
        api.package_name.replace('.', "-")
    }

    fn templates(&self) -> &'static [OutputTemplate] {
        TEMPLATES
    }
}
