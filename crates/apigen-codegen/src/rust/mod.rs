//! The Rust codec.
//!
//! Generates a client crate: model types under `crate::model`, one client
//! per service under `crate::client`, and a `Cargo.toml` whose dependencies
//! come from the dependency resolver. Type names are always fully qualified
//! (`std::option::Option<T>`) so generated code never collides with model
//! types of the same name.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::rust::RustCodec;
//! use apigen_codegen::Codec;
//! use apigen_core::CodecOptions;
//!
//! let codec = RustCodec::new(CodecOptions::default());
//! assert_eq!(codec.to_snake("HTTPRequest"), "http_request");
//! assert_eq!(codec.to_pascal("self"), "Self_");
//! assert_eq!(codec.optional_of("i32"), "std::option::Option<i32>");
//! ```

mod keywords;

pub use keywords::escape_keyword;

use crate::codec::{Codec, OutputTemplate, Target, merge_packages};
use crate::query::{Presence, QueryParameter, QueryValue};
use apigen_core::model::Typez;
use apigen_core::{Api, CodecOptions, PackageOption, UsedIf};

/// Root of model types in the API's own package.
const MODEL_ROOT: &str = "crate::model";

/// Root of client types in the API's own package.
const CLIENT_ROOT: &str = "crate::client";

const TEMPLATES: &[OutputTemplate] = &[
    OutputTemplate { template: "rust/Cargo.toml", path: "Cargo.toml" },
    OutputTemplate { template: "rust/README.md", path: "README.md" },
    OutputTemplate { template: "rust/lib.rs", path: "src/lib.rs" },
    OutputTemplate { template: "rust/model.rs", path: "src/model.rs" },
    OutputTemplate { template: "rust/client.rs", path: "src/client.rs" },
];

/// Codec producing a Rust client crate.
#[derive(Debug, Clone)]
pub struct RustCodec {
    options: CodecOptions,
    packages: Vec<PackageOption>,
}

impl RustCodec {
    /// Creates the codec, merging configured package descriptors over the
    /// Rust defaults.
    #[must_use]
    pub fn new(options: CodecOptions) -> Self {
        let packages = merge_packages(default_packages(), &options.packages);
        Self { options, packages }
    }
}

impl Codec for RustCodec {
    fn target(&self) -> Target {
        Target::Rust
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
        self.to_snake(name)
    }

    fn method_name(&self, name: &str) -> String {
        self.to_snake(name)
    }

    fn module_name(&self, message_name: &str) -> String {
        self.to_snake(message_name)
    }

    fn path_separator(&self) -> &'static str {
        "::"
    }

    fn scalar_type(&self, typez: Typez) -> Option<&'static str> {
        let name = match typez {
            Typez::Double => "f64",
            Typez::Float => "f32",
            Typez::Int32 | Typez::Sint32 | Typez::Sfixed32 => "i32",
            Typez::Int64 | Typez::Sint64 | Typez::Sfixed64 => "i64",
            Typez::Uint32 | Typez::Fixed32 => "u32",
            Typez::Uint64 | Typez::Fixed64 => "u64",
            Typez::Bool => "bool",
            Typez::String => "std::string::String",
            Typez::Bytes => "::bytes::Bytes",
            Typez::Message | Typez::Enum | Typez::Group => return None,
        };
        Some(name)
    }

    fn scalar_package(&self, typez: Typez) -> Option<&'static str> {
        (typez == Typez::Bytes).then_some("bytes")
    }

    fn map_of(&self, key: &str, value: &str) -> String {
        format!("std::collections::HashMap<{key},{value}>")
    }

    fn collection_of(&self, element: &str) -> String {
        format!("std::vec::Vec<{element}>")
    }

    fn optional_of(&self, inner: &str) -> String {
        format!("std::option::Option<{inner}>")
    }

    fn indirection_of(&self, inner: &str) -> String {
        format!("std::boxed::Box<{inner}>")
    }

    fn oneof_member_of(&self, inner: &str, is_message: bool) -> String {
        if is_message { self.indirection_of(inner) } else { inner.to_string() }
    }

    fn model_qualifier(&self, package: Option<&str>) -> String {
        match package {
            Some(package) => package.to_string(),
            None => self
                .options
                .module_path
                .clone()
                .unwrap_or_else(|| MODEL_ROOT.to_string()),
        }
    }

    fn client_qualifier(&self, package: Option<&str>) -> String {
        package.map_or_else(|| CLIENT_ROOT.to_string(), |p| format!("{p}::client"))
    }

    fn comment_prefix(&self) -> &'static str {
        "///"
    }

    fn no_compile_fence(&self) -> &'static str {
        "```norust"
    }

    fn path_placeholder(&self, _index: usize) -> String {
        "{}".to_string()
    }

    fn unwrap_path_parameter(&self, expr: &str, name: &str) -> String {
        format!("{expr}.as_ref().ok_or_else(|| gax::path_parameter::missing(\"{name}\"))?")
    }

    fn enum_wire_value(&self, expr: &str) -> String {
        format!("{expr}.value()")
    }

    fn query_parameter_expr(&self, parameter: &QueryParameter) -> String {
        let QueryParameter { name, accessor, .. } = parameter;
        match (parameter.presence, parameter.value) {
            (Presence::Required, QueryValue::Scalar) => {
                format!("let builder = builder.query(&[(\"{name}\", &{accessor})]);")
            }
            (Presence::Required, QueryValue::Enum) => {
                format!("let builder = builder.query(&[(\"{name}\", {accessor}.value())]);")
            }
            (_, QueryValue::Scalar) => format!(
                "let builder = {accessor}.iter().fold(builder, |builder, p| builder.query(&[(\"{name}\", p)]));"
            ),
            (_, QueryValue::Enum) => format!(
                "let builder = {accessor}.iter().fold(builder, |builder, p| builder.query(&[(\"{name}\", p.value())]));"
            ),
            (Presence::Required, QueryValue::Message) => format!(
                "let builder = {{ use gax::query_parameter::QueryParameter; serde_json::to_value(&{accessor}).map_err(Error::ser)?.add(builder, \"{name}\") }};"
            ),
            (_, QueryValue::Message) => format!(
                "let builder = {accessor}.iter().map(|p| serde_json::to_value(p).map_err(Error::ser)).collect::<Result<Vec<_>>>()?.into_iter().fold(builder, |builder, v| {{ use gax::query_parameter::QueryParameter; v.add(builder, \"{name}\") }});"
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

fn package(alias: &str, package: &str, version: &str) -> PackageOption {
    let mut option = PackageOption::new(alias);
    option.package = package.to_string();
    option.version = Some(version.to_string());
    option
}

fn default_packages() -> Vec<PackageOption> {
    let always = |mut p: PackageOption| {
        p.force_used = true;
        p
    };
    let used_if = |predicate: UsedIf, mut p: PackageOption| {
        p.used_if = Some(predicate);
        p
    };
    let mut bytes = package("bytes", "bytes", "1");
    bytes.features.push("serde".to_string());
    let mut gax = used_if(UsedIf::Services, package("gax", "google-cloud-gax", "0.1"));
    gax.streaming = true;
    let mut reqwest = used_if(UsedIf::Services, package("reqwest", "reqwest", "0.12"));
    reqwest.features.push("json".to_string());
    let mut serde = always(package("serde", "serde", "1"));
    serde.features.push("derive".to_string());
    let mut wkt = package("wkt", "google-cloud-wkt", "0.1");
    wkt.sources.push("google.protobuf".to_string());

    vec![
        used_if(UsedIf::Services, package("async-trait", "async-trait", "0.1")),
        bytes,
        used_if(UsedIf::Streaming, package("futures", "futures", "0.3")),
        gax,
        used_if(UsedIf::Lro, package("lro", "google-cloud-lro", "0.1")),
        reqwest,
        serde,
        always(package("serde_json", "serde_json", "1")),
        always(package("serde_with", "serde_with", "3")),
        used_if(UsedIf::Services, package("tracing", "tracing", "0.1")),
        wkt,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::query_parameter;
    use apigen_core::model::Field;

    fn codec() -> RustCodec {
        RustCodec::new(CodecOptions::default())
    }

    #[test]
    fn test_identifiers() {
        let codec = codec();
        assert_eq!(codec.to_snake("type"), "r#type");
        assert_eq!(codec.to_snake("Self"), "self_");
        assert_eq!(codec.to_pascal("Self"), "Self_");
        assert_eq!(codec.to_camel("fooBar"), "fooBar");
        assert_eq!(codec.to_snake_no_mangling("Type"), "type");
        assert_eq!(codec.member_name("createTime"), "create_time");
    }

    #[test]
    fn test_every_scalar_has_a_type() {
        let codec = codec();
        for typez in [
            Typez::Double,
            Typez::Float,
            Typez::Int64,
            Typez::Uint64,
            Typez::Int32,
            Typez::Fixed64,
            Typez::Fixed32,
            Typez::Bool,
            Typez::String,
            Typez::Bytes,
            Typez::Uint32,
            Typez::Sfixed32,
            Typez::Sfixed64,
            Typez::Sint32,
            Typez::Sint64,
        ] {
            assert!(codec.scalar_type(typez).is_some(), "{typez:?}");
        }
        assert_eq!(codec.scalar_type(Typez::Group), None);
        assert_eq!(codec.scalar_type(Typez::Fixed64), Some("u64"));
    }

    #[test]
    fn test_default_packages_are_sorted_and_overridable() {
        let codec = codec();
        let aliases: Vec<_> = codec.packages().iter().map(|p| p.alias.as_str()).collect();
        let mut sorted = aliases.clone();
        sorted.sort_unstable();
        assert_eq!(aliases, sorted);
        assert_eq!(
            codec.package_for_source("google.protobuf").map(|p| p.alias.as_str()),
            Some("wkt")
        );

        let mut options = CodecOptions::default();
        options.packages.push(PackageOption::new("wkt"));
        let codec = RustCodec::new(options);
        assert!(codec.package_for_source("google.protobuf").is_none());
    }

    #[test]
    fn test_query_parameter_statements() {
        let codec = codec();
        let required = query_parameter(&codec, &Field::new("page_size", Typez::Int32));
        assert_eq!(
            codec.query_parameter_expr(&required),
            "let builder = builder.query(&[(\"pageSize\", &req.page_size)]);"
        );

        let optional = query_parameter(&codec, &Field::new("view", Typez::Enum).optional());
        assert_eq!(
            codec.query_parameter_expr(&optional),
            "let builder = req.view.iter().fold(builder, |builder, p| builder.query(&[(\"view\", p.value())]));"
        );

        let mask = query_parameter(
            &codec,
            &Field::new("update_mask", Typez::Message)
                .with_type_id(".google.protobuf.FieldMask")
                .optional(),
        );
        let statement = codec.query_parameter_expr(&mask);
        assert!(statement.starts_with("let builder = req.update_mask.iter()"));
        assert!(statement.contains("serde_json::to_value(p)"));
        assert!(statement.contains("v.add(builder, \"updateMask\")"));
    }

    #[test]
    fn test_package_names() {
        let codec = codec();
        let api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
        assert_eq!(codec.package_name(&api), "google-cloud-secretmanager-v1");

        let codec = RustCodec::new(CodecOptions {
            package_name_override: Some("secretmanager".to_string()),
            ..CodecOptions::default()
        });
        assert_eq!(codec.package_name(&api), "secretmanager");
    }
}
