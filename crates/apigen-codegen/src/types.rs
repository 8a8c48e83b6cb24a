//! Type resolution.
//!
//! Maps model fields to target type expressions and computes fully qualified
//! names for messages and enums. Qualification walks the parent chain, so a
//! nested type is reachable through the scopes of its enclosing messages,
//! and elements of another source package are reached through that
//! package's descriptor, which marks the package as used.
//!
//! Unsupported or unresolvable types never stop the run: they resolve to an
//! empty type expression and a diagnostic is recorded.

use crate::codec::Codec;
use crate::state::{DiagnosticKind, ResolveState};
use apigen_core::model::{Enum, Field, Message, MessageIndex, Typez};
use apigen_core::Api;

/// Resolves the full type expression of `field`.
///
/// Wrapping rules, in order:
/// - map fields are never wrapped
/// - oneof members use the target's member wrapper
/// - repeated fields use the collection wrapper, without indirection
/// - recursive fields use indirection, inside the optional wrapper when
///   the field is optional
/// - optional fields use the optional wrapper
///
/// With `primitive_only` the base type is returned unwrapped.
pub fn field_type<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    field: &Field,
    primitive_only: bool,
    state: &mut ResolveState,
) -> String {
    let base = base_field_type(codec, api, field, state);
    if primitive_only || base.is_empty() || is_map_field(api, field) {
        return base;
    }
    if field.is_oneof {
        return codec.oneof_member_of(&base, field.typez == Typez::Message);
    }
    if field.repeated {
        return codec.collection_of(&base);
    }
    if field.recursive {
        let boxed = codec.indirection_of(&base);
        return if field.optional { codec.optional_of(&boxed) } else { boxed };
    }
    if field.optional {
        return codec.optional_of(&base);
    }
    base
}

/// Resolves the unwrapped type of `field`.
///
/// Map fields resolve to the map wrapper over their key and value types.
pub fn base_field_type<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    field: &Field,
    state: &mut ResolveState,
) -> String {
    match field.typez {
        Typez::Group => {
            state.diagnose(
                DiagnosticKind::UnsupportedType,
                &field.id,
                "group fields are not supported",
            );
            String::new()
        }
        Typez::Message => {
            let Some(message) = referenced_message(api, field) else {
                state.diagnose(
                    DiagnosticKind::UnresolvedType,
                    &field.id,
                    format!("cannot find message {:?}", field.typez_id),
                );
                return String::new();
            };
            if message.is_map {
                return map_type(codec, api, message, state);
            }
            fq_message_name(codec, api, message, state)
        }
        Typez::Enum => {
            let Some(value) = field.typez_id.as_deref().and_then(|id| api.enum_by_id(id)) else {
                state.diagnose(
                    DiagnosticKind::UnresolvedType,
                    &field.id,
                    format!("cannot find enum {:?}", field.typez_id),
                );
                return String::new();
            };
            fq_enum_name(codec, api, value, state)
        }
        scalar => {
            if let Some(package) = codec.scalar_package(scalar) {
                state.mark_used(package);
            }
            codec.scalar_type(scalar).map(str::to_string).unwrap_or_default()
        }
    }
}

/// Returns `true` if `field` references a map entry message.
#[must_use]
pub fn is_map_field(api: &Api, field: &Field) -> bool {
    field.typez == Typez::Message && referenced_message(api, field).is_some_and(|m| m.is_map)
}

/// Fully qualified name of a message.
pub fn fq_message_name<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    message: &Message,
    state: &mut ResolveState,
) -> String {
    let scope = element_scope(codec, api, message.parent, &message.package, state);
    join(codec, &scope, &codec.type_name(&message.name))
}

/// Fully qualified name of an enum.
pub fn fq_enum_name<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    value: &Enum,
    state: &mut ResolveState,
) -> String {
    let scope = element_scope(codec, api, value.parent, &value.package, state);
    join(codec, &scope, &codec.type_name(&value.name))
}

/// Scope holding the nested types of `message`, e.g. the module named after
/// it.
pub fn children_scope<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    message: &Message,
    state: &mut ResolveState,
) -> String {
    let scope = element_scope(codec, api, message.parent, &message.package, state);
    join(codec, &scope, &codec.module_name(&message.name))
}

/// Qualifier of a source package: `None` for the API's own package.
///
/// External packages are looked up in the codec's package descriptors and
/// marked used. A package without a descriptor is reported and its source
/// name is returned verbatim.
pub fn package_qualifier<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    package: &str,
    state: &mut ResolveState,
) -> Option<String> {
    if package == api.package_name {
        return None;
    }
    if let Some(descriptor) = codec.package_for_source(package) {
        state.mark_used(&descriptor.alias);
        return Some(codec.package_qualifier(descriptor));
    }
    state.diagnose(
        DiagnosticKind::UnknownPackage,
        package,
        "no package descriptor maps this source package",
    );
    Some(package.to_string())
}

/// Joins a scope and a name with the codec's separator.
#[must_use]
pub fn join<C: Codec + ?Sized>(codec: &C, scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}{}{name}", codec.path_separator())
    }
}

fn element_scope<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    parent: Option<MessageIndex>,
    package: &str,
    state: &mut ResolveState,
) -> String {
    match parent {
        Some(parent) => children_scope(codec, api, api.message(parent), state),
        None => {
            let qualifier = package_qualifier(codec, api, package, state);
            codec.model_qualifier(qualifier.as_deref())
        }
    }
}

fn map_type<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    message: &Message,
    state: &mut ResolveState,
) -> String {
    let Some((key, value)) = message.map_fields() else {
        state.diagnose(
            DiagnosticKind::UnresolvedType,
            &message.id,
            "map entry must have `key` and `value` fields",
        );
        return String::new();
    };
    let key = base_field_type(codec, api, key, state);
    let value = base_field_type(codec, api, value, state);
    codec.map_of(&key, &value)
}

fn referenced_message<'a>(api: &'a Api, field: &Field) -> Option<&'a Message> {
    field.typez_id.as_deref().and_then(|id| api.message_by_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rust::RustCodec;
    use crate::typescript::TypeScriptCodec;
    use apigen_core::{CodecOptions, PackageOption};

    fn fake_api() -> Api {
        let mut api = Api::new("test", "test");
        api.add_message(Message::new("Target", ".test.Target"));
        let fake = api.add_message(
            Message::new("Fake", ".test.Fake")
                .with_field(Field::new("f_int32", Typez::Int32))
                .with_field(Field::new("f_bytes", Typez::Bytes))
                .with_field(
                    Field::new("target", Typez::Message)
                        .with_type_id(".test.Target")
                        .optional(),
                )
                .with_field(
                    Field::new("child", Typez::Message)
                        .with_type_id(".test.Fake")
                        .optional()
                        .recursive(),
                )
                .with_field(
                    Field::new("children", Typez::Message)
                        .with_type_id(".test.Fake")
                        .repeated()
                        .recursive(),
                )
                .with_field(
                    Field::new("labels", Typez::Message).with_type_id(".test.Fake.LabelsEntry"),
                )
                .with_field(Field::new("legacy", Typez::Group))
                .with_oneof(
                    "choice",
                    vec![
                        Field::new("as_target", Typez::Message).with_type_id(".test.Target"),
                        Field::new("as_text", Typez::String),
                    ],
                ),
        );
        api.add_nested_message(
            fake,
            Message::map_entry(
                ".test.Fake.LabelsEntry",
                Field::new("key", Typez::String),
                Field::new("value", Typez::Int64),
            ),
        );
        api.add_nested_message(fake, Message::new("Inner", ".test.Fake.Inner"));
        api
    }

    fn resolve(codec: &dyn Codec, api: &Api, name: &str) -> (String, ResolveState) {
        let mut state = ResolveState::new();
        let message = api.message_by_id(".test.Fake").unwrap();
        let field = message.field(name).unwrap();
        (field_type(codec, api, field, false, &mut state), state)
    }

    #[test]
    fn test_rust_wrapping_rules() {
        let api = fake_api();
        let codec = RustCodec::new(CodecOptions::default());

        assert_eq!(resolve(&codec, &api, "f_int32").0, "i32");
        assert_eq!(
            resolve(&codec, &api, "target").0,
            "std::option::Option<crate::model::Target>"
        );
        assert_eq!(
            resolve(&codec, &api, "child").0,
            "std::option::Option<std::boxed::Box<crate::model::Fake>>"
        );
        assert_eq!(
            resolve(&codec, &api, "children").0,
            "std::vec::Vec<crate::model::Fake>"
        );
        assert_eq!(
            resolve(&codec, &api, "labels").0,
            "std::collections::HashMap<std::string::String,i64>"
        );
        assert_eq!(
            resolve(&codec, &api, "as_target").0,
            "std::boxed::Box<crate::model::Target>"
        );
        assert_eq!(resolve(&codec, &api, "as_text").0, "std::string::String");
    }

    #[test]
    fn test_bytes_marks_package_used() {
        let api = fake_api();
        let codec = RustCodec::new(CodecOptions::default());

        let (ty, state) = resolve(&codec, &api, "f_bytes");
        assert_eq!(ty, "::bytes::Bytes");
        assert!(state.is_used("bytes"));
    }

    #[test]
    fn test_group_is_empty_with_diagnostic() {
        let api = fake_api();
        let codec = RustCodec::new(CodecOptions::default());

        let (ty, state) = resolve(&codec, &api, "legacy");
        assert!(ty.is_empty());
        assert_eq!(state.diagnostics().len(), 1);
        assert_eq!(state.diagnostics()[0].kind, DiagnosticKind::UnsupportedType);
    }

    #[test]
    fn test_primitive_only_skips_wrappers() {
        let api = fake_api();
        let codec = RustCodec::new(CodecOptions::default());
        let message = api.message_by_id(".test.Fake").unwrap();
        let mut state = ResolveState::new();

        let child = message.field("child").unwrap();
        assert_eq!(field_type(&codec, &api, child, true, &mut state), "crate::model::Fake");
        let labels = message.field("labels").unwrap();
        assert_eq!(
            field_type(&codec, &api, labels, true, &mut state),
            "std::collections::HashMap<std::string::String,i64>"
        );
    }

    #[test]
    fn test_nested_names_walk_parent_chain() {
        let api = fake_api();
        let codec = RustCodec::new(CodecOptions::default());
        let mut state = ResolveState::new();

        let inner = api.message_by_id(".test.Fake.Inner").unwrap();
        assert_eq!(
            fq_message_name(&codec, &api, inner, &mut state),
            "crate::model::fake::Inner"
        );
    }

    #[test]
    fn test_module_path_option_changes_local_root() {
        let api = fake_api();
        let options = CodecOptions {
            module_path: Some("crate::generated".to_string()),
            ..CodecOptions::default()
        };
        let codec = RustCodec::new(options);

        assert_eq!(
            resolve(&codec, &api, "target").0,
            "std::option::Option<crate::generated::Target>"
        );
    }

    #[test]
    fn test_external_package_is_qualified_and_marked() {
        let mut api = fake_api();
        api.register_external_message(
            Message::new("Expr", ".google.type.Expr").with_package("google.type"),
        );
        let mut gtype = PackageOption::new("gtype");
        gtype.package = "google-cloud-type".to_string();
        gtype.sources.push("google.type".to_string());
        let options = CodecOptions {
            packages: vec![gtype],
            ..CodecOptions::default()
        };
        let codec = RustCodec::new(options);
        let mut state = ResolveState::new();

        let expr = api.message_by_id(".google.type.Expr").unwrap();
        assert_eq!(fq_message_name(&codec, &api, expr, &mut state), "gtype::Expr");
        assert!(state.is_used("gtype"));
    }

    #[test]
    fn test_unknown_package_is_reported() {
        let mut api = fake_api();
        api.register_external_message(
            Message::new("Status", ".google.rpc.Status").with_package("google.rpc"),
        );
        let codec = RustCodec::new(CodecOptions::default());
        let mut state = ResolveState::new();

        let status = api.message_by_id(".google.rpc.Status").unwrap();
        assert_eq!(fq_message_name(&codec, &api, status, &mut state), "google.rpc::Status");
        assert_eq!(state.diagnostics()[0].kind, DiagnosticKind::UnknownPackage);
    }

    #[test]
    fn test_typescript_wrapping_rules() {
        let api = fake_api();
        let codec = TypeScriptCodec::new(CodecOptions::default());

        assert_eq!(resolve(&codec, &api, "f_int32").0, "number");
        assert_eq!(resolve(&codec, &api, "target").0, "Target | undefined");
        assert_eq!(resolve(&codec, &api, "child").0, "Fake | undefined");
        assert_eq!(resolve(&codec, &api, "children").0, "Array<Fake>");
        assert_eq!(resolve(&codec, &api, "labels").0, "Record<string, string>");
    }
}
