//! HTTP path resolution.
//!
//! Turns a method's path template into a format string with one placeholder
//! per variable segment, plus one accessor expression per placeholder that
//! reads the value from the request. Accessors walk dotted field paths;
//! every optional component before the last one is unwrapped with a
//! missing-path-parameter guard, and enum components are converted to their
//! wire value.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::paths::http_path_format;
//! use apigen_codegen::rust::RustCodec;
//! use apigen_core::{CodecOptions, PathTemplate};
//!
//! let codec = RustCodec::new(CodecOptions::default());
//! let template = PathTemplate::new()
//!     .literal("v1")
//!     .field("name")
//!     .verb("access");
//! assert_eq!(http_path_format(&codec, &template), "/v1/{}:access");
//! ```

use crate::codec::Codec;
use crate::state::{DiagnosticKind, ResolveState};
use apigen_core::model::{Message, Method, PathSegment, PathTemplate, Typez};
use apigen_core::Api;

/// Format string of a path template.
#[must_use]
pub fn http_path_format<C: Codec + ?Sized>(codec: &C, template: &PathTemplate) -> String {
    let mut format = String::new();
    let mut index = 0;
    for segment in &template.segments {
        match segment {
            PathSegment::Literal(literal) => {
                format.push('/');
                format.push_str(literal);
            }
            PathSegment::FieldPath(_) => {
                format.push('/');
                format.push_str(&codec.path_placeholder(index));
                index += 1;
            }
            PathSegment::Verb(verb) => {
                format.push(':');
                format.push_str(verb);
            }
        }
    }
    format
}

/// Accessor expressions for every variable segment of the method's primary
/// binding, in template order.
pub fn http_path_args<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    method: &Method,
    state: &mut ResolveState,
) -> Vec<String> {
    let Some(binding) = method.path_info.primary() else {
        return Vec::new();
    };
    let request = api.message_by_id(&method.input_type_id);
    binding
        .template
        .field_paths()
        .map(|path| path_accessor(codec, api, request, path, state))
        .collect()
}

/// Accessor expression for one dotted field path of `request`.
pub fn path_accessor<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    request: Option<&Message>,
    path: &str,
    state: &mut ResolveState,
) -> String {
    let components: Vec<&str> = path.split('.').collect();
    let mut expr = codec.request_variable().to_string();
    let mut current = request;

    for (i, component) in components.iter().enumerate() {
        expr = codec.member_access(&expr, &codec.member_name(component));
        let Some(field) = current.and_then(|m| m.field(component)) else {
            state.diagnose(
                DiagnosticKind::UnknownPathField,
                path,
                format!("request has no field `{component}`"),
            );
            current = None;
            continue;
        };
        if field.typez == Typez::Enum {
            expr = codec.enum_wire_value(&expr);
        }
        let terminal = i + 1 == components.len();
        if !terminal && field.optional {
            expr = codec.unwrap_path_parameter(&expr, &components[..=i].join("."));
        }
        current = match field.typez {
            Typez::Message => field.typez_id.as_deref().and_then(|id| api.message_by_id(id)),
            _ => None,
        };
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rust::RustCodec;
    use crate::typescript::TypeScriptCodec;
    use apigen_core::model::{Enum, Field};
    use apigen_core::{CodecOptions, PathBinding, PathInfo};

    fn api() -> Api {
        let mut api = Api::new("test", "test.v1");
        api.add_enum(Enum::new("Kind", ".test.v1.Kind").with_value("KIND_UNSPECIFIED", 0));
        api.add_message(
            Message::new("Secret", ".test.v1.Secret")
                .with_field(Field::new("name", Typez::String))
                .with_field(Field::new("kind", Typez::Enum).with_type_id(".test.v1.Kind")),
        );
        api.add_message(
            Message::new("Request", ".test.v1.Request")
                .with_field(Field::new("project", Typez::String))
                .with_field(
                    Field::new("secret", Typez::Message)
                        .with_type_id(".test.v1.Secret")
                        .optional(),
                ),
        );
        api
    }

    fn method(template: PathTemplate) -> Method {
        Method::new(
            "UpdateSecret",
            ".test.v1.Request",
            ".test.v1.Secret",
            PathInfo::new(PathBinding::new("PATCH", template)),
        )
    }

    #[test]
    fn test_format_with_every_segment_kind() {
        let codec = RustCodec::new(CodecOptions::default());
        let template = PathTemplate::new()
            .literal("v1")
            .literal("projects")
            .field("project")
            .literal("secrets")
            .field("secret.name")
            .verb("addVersion");
        assert_eq!(
            http_path_format(&codec, &template),
            "/v1/projects/{}/secrets/{}:addVersion"
        );
    }

    #[test]
    fn test_rust_args_guard_optional_components() {
        let api = api();
        let codec = RustCodec::new(CodecOptions::default());
        let method = method(PathTemplate::new().field("project").field("secret.name"));
        let mut state = ResolveState::new();

        let args = http_path_args(&codec, &api, &method, &mut state);
        assert_eq!(
            args,
            vec![
                "req.project".to_string(),
                "req.secret.as_ref().ok_or_else(|| gax::path_parameter::missing(\"secret\"))?.name"
                    .to_string(),
            ]
        );
        assert!(state.diagnostics().is_empty());
    }

    #[test]
    fn test_one_guard_per_non_terminal_optional_component() {
        let api = api();
        let codec = RustCodec::new(CodecOptions::default());
        let mut state = ResolveState::new();
        let request = api.message_by_id(".test.v1.Request");

        let expr = path_accessor(&codec, &api, request, "secret.name", &mut state);
        assert_eq!(expr.matches("path_parameter::missing").count(), 1);
        let expr = path_accessor(&codec, &api, request, "secret", &mut state);
        assert_eq!(expr, "req.secret");
    }

    #[test]
    fn test_enum_components_use_wire_value() {
        let api = api();
        let codec = RustCodec::new(CodecOptions::default());
        let request = api.message_by_id(".test.v1.Request");

        let expr = path_accessor(&codec, &api, request, "secret.kind", &mut ResolveState::new());
        assert!(expr.ends_with(".kind.value()"), "{expr}");
    }

    #[test]
    fn test_unknown_component_is_reported() {
        let api = api();
        let codec = RustCodec::new(CodecOptions::default());
        let request = api.message_by_id(".test.v1.Request");
        let mut state = ResolveState::new();

        let expr = path_accessor(&codec, &api, request, "parent", &mut state);
        assert_eq!(expr, "req.parent");
        assert_eq!(state.diagnostics()[0].kind, DiagnosticKind::UnknownPathField);
    }

    #[test]
    fn test_typescript_args() {
        let api = api();
        let codec = TypeScriptCodec::new(CodecOptions::default());
        let method = method(PathTemplate::new().field("secret.name"));

        let args = http_path_args(&codec, &api, &method, &mut ResolveState::new());
        assert_eq!(
            args,
            vec!["(req.secret ?? missingPathParameter(\"secret\")).name".to_string()]
        );
        assert_eq!(http_path_format(&codec, &method.path_info.bindings[0].template), "/{0}");
    }
}
