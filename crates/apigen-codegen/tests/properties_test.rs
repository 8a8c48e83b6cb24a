//! Properties every codec must hold, checked through the public resolvers.

mod common;

use apigen_codegen::docs::format_docs;
use apigen_codegen::packages::{DependencyResolver, evaluate};
use apigen_codegen::paths::path_accessor;
use apigen_codegen::query::query_params;
use apigen_codegen::rust::RustCodec;
use apigen_codegen::types::field_type;
use apigen_codegen::typescript::TypeScriptCodec;
use apigen_codegen::{Codec, DiagnosticKind, ResolveState, Target, codec_for};
use apigen_core::model::{
    Field, Message, Method, PathBinding, PathInfo, PathTemplate, Service, Typez,
};
use apigen_core::{Api, CodecOptions, PackageOption, UsedIf};

const SCALARS: &[Typez] = &[
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
];

fn codecs() -> Vec<Box<dyn Codec>> {
    vec![
        codec_for(Target::Rust, CodecOptions::default()),
        codec_for(Target::TypeScript, CodecOptions::default()),
    ]
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_case_conversion_is_idempotent() {
    let inputs = [
        "create_time",
        "HTTPRequest",
        "IAMPolicy",
        "fooBarBaz",
        "v1beta2",
        "type",
        "self",
        "Self",
        "delete",
        "page_size",
    ];
    for codec in codecs() {
        for input in inputs {
            let pascal = codec.to_pascal(input);
            assert_eq!(codec.to_pascal(&pascal), pascal, "{} pascal {input}", codec.target());
            let snake = codec.to_snake(input);
            assert_eq!(codec.to_snake(&snake), snake, "{} snake {input}", codec.target());
            let camel = codec.to_camel(input);
            assert_eq!(codec.to_camel(&camel), camel, "{} camel {input}", codec.target());
        }
    }
}

#[test]
fn test_escaping_is_a_fixed_point() {
    let words = [
        "type", "self", "Self", "super", "crate", "async", "match", "delete", "enum", "interface",
        "string", "this",
    ];
    for word in words {
        let escaped = apigen_codegen::rust::escape_keyword(word);
        assert_eq!(apigen_codegen::rust::escape_keyword(&escaped), escaped, "rust {word}");

        let escaped = apigen_codegen::typescript::escape_keyword(word);
        assert_eq!(
            apigen_codegen::typescript::escape_keyword(&escaped),
            escaped,
            "typescript {word}"
        );
    }
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn test_type_resolution_is_total() {
    let mut api = Api::new("test", "test");
    let mut fake = Message::new("Fake", ".test.Fake");
    for (i, &typez) in SCALARS.iter().enumerate() {
        fake = fake
            .with_field(Field::new(format!("plain_{i}"), typez))
            .with_field(Field::new(format!("optional_{i}"), typez).optional())
            .with_field(Field::new(format!("repeated_{i}"), typez).repeated());
    }
    api.add_message(fake);

    for codec in codecs() {
        let mut state = ResolveState::new();
        let message = api.message_by_id(".test.Fake").unwrap();
        for field in &message.fields {
            let resolved = field_type(codec.as_ref(), &api, field, false, &mut state);
            assert!(!resolved.is_empty(), "{} {}", codec.target(), field.name);
        }
        assert!(state.diagnostics().is_empty());
    }
}

#[test]
fn test_group_resolves_to_empty_with_diagnostic() {
    let mut api = Api::new("test", "test");
    api.add_message(Message::new("Fake", ".test.Fake").with_field(Field::new("legacy", Typez::Group)));
    let field = api.message_by_id(".test.Fake").unwrap().field("legacy").unwrap();

    for codec in codecs() {
        let mut state = ResolveState::new();
        assert_eq!(field_type(codec.as_ref(), &api, field, false, &mut state), "");
        assert_eq!(state.diagnostics().len(), 1);
        assert_eq!(state.diagnostics()[0].kind, DiagnosticKind::UnsupportedType);
        assert_eq!(state.diagnostics()[0].subject, ".test.Fake.legacy");
    }
}

fn target_and_fake() -> Api {
    let mut api = Api::new("test", "test");
    api.add_message(Message::new("Target", ".test.Target"));
    api.add_message(
        Message::new("Fake", ".test.Fake")
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
            ),
    );
    api
}

fn resolve_fake_fields<C: Codec + ?Sized>(codec: &C, api: &Api) -> Vec<String> {
    let mut state = ResolveState::new();
    let fake = api.message_by_id(".test.Fake").unwrap();
    fake.fields
        .iter()
        .map(|f| field_type(codec, api, f, false, &mut state))
        .collect()
}

#[test]
fn test_wrapping_of_optional_recursive_and_repeated_messages() {
    let api = target_and_fake();

    let rust = RustCodec::new(CodecOptions::default());
    assert_eq!(
        resolve_fake_fields(&rust, &api),
        vec![
            "std::option::Option<crate::model::Target>",
            "std::option::Option<std::boxed::Box<crate::model::Fake>>",
            "std::vec::Vec<crate::model::Fake>",
        ]
    );

    let typescript = TypeScriptCodec::new(CodecOptions::default());
    assert_eq!(
        resolve_fake_fields(&typescript, &api),
        vec!["Target | undefined", "Fake | undefined", "Array<Fake>"]
    );
}

#[test]
fn test_module_path_moves_model_root() {
    let api = target_and_fake();
    let rust = RustCodec::new(CodecOptions {
        module_path: Some("crate::generated".to_string()),
        ..CodecOptions::default()
    });
    assert_eq!(
        resolve_fake_fields(&rust, &api)[0],
        "std::option::Option<crate::generated::Target>"
    );
}

// ============================================================================
// Paths and Query Parameters
// ============================================================================

fn nested_request_api() -> Api {
    let mut api = Api::new("test", "test");
    api.add_message(Message::new("C", ".test.C").with_field(Field::new("leaf", Typez::String)));
    api.add_message(
        Message::new("B", ".test.B")
            .with_field(Field::new("c", Typez::Message).with_type_id(".test.C").optional()),
    );
    api.add_message(
        Message::new("Request", ".test.Request")
            .with_field(Field::new("b", Typez::Message).with_type_id(".test.B").optional())
            .with_field(Field::new("project", Typez::String))
            .with_field(Field::new("filter", Typez::String))
            .with_field(Field::new("payload", Typez::Message).with_type_id(".test.C")),
    );
    api
}

#[test]
fn test_one_guard_per_optional_component() {
    let api = nested_request_api();
    let request = api.message_by_id(".test.Request");

    let rust = RustCodec::new(CodecOptions::default());
    let mut state = ResolveState::new();
    let expr = path_accessor(&rust, &api, request, "b.c.leaf", &mut state);
    assert_eq!(expr.matches("gax::path_parameter::missing(").count(), 2);
    let outer = expr.find("missing(\"b\")").unwrap();
    let inner = expr.find("missing(\"b.c\")").unwrap();
    assert!(outer < inner, "guards run root to leaf: {expr}");
    assert!(expr.ends_with(".leaf"));

    let typescript = TypeScriptCodec::new(CodecOptions::default());
    let expr = path_accessor(&typescript, &api, request, "b.c.leaf", &mut state);
    assert_eq!(
        expr,
        "((req.b ?? missingPathParameter(\"b\")).c ?? missingPathParameter(\"b.c\")).leaf"
    );
    assert!(state.diagnostics().is_empty());
}

#[test]
fn test_unknown_path_field_is_diagnosed() {
    let api = nested_request_api();
    let request = api.message_by_id(".test.Request");
    let rust = RustCodec::new(CodecOptions::default());
    let mut state = ResolveState::new();

    let expr = path_accessor(&rust, &api, request, "missing", &mut state);
    assert_eq!(expr, "req.missing");
    assert_eq!(state.diagnostics()[0].kind, DiagnosticKind::UnknownPathField);
}

#[test]
fn test_query_params_exclude_path_and_body_fields() {
    let api = nested_request_api();
    let binding = PathBinding::new("POST", PathTemplate::new().literal("v1").field("project"))
        .with_query_parameter("project")
        .with_query_parameter("filter")
        .with_query_parameter("payload");
    let method = Method::new(
        "Create",
        ".test.Request",
        ".test.C",
        PathInfo::new(binding.clone()).with_body("payload"),
    );

    let names: Vec<_> = query_params(&api, &method, &binding)
        .into_iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["filter"]);

    let whole_body = Method::new(
        "Create",
        ".test.Request",
        ".test.C",
        PathInfo::new(binding.clone()).with_body("*"),
    );
    assert!(query_params(&api, &whole_body, &binding).is_empty());
}

// ============================================================================
// Documentation
// ============================================================================

fn rust_docs(api: &Api, documentation: &str) -> Vec<String> {
    let codec = RustCodec::new(CodecOptions::default());
    format_docs(&codec, api, documentation, &mut ResolveState::new())
}

#[test]
fn test_fenced_code_is_marked_no_compile() {
    let api = Api::new("test", "test");
    let lines = rust_docs(&api, "```\nlet secret = client.get();\n```\n");
    assert_eq!(
        lines,
        vec!["/// ```norust", "/// let secret = client.get();", "/// ```"]
    );
}

#[test]
fn test_unterminated_quote_is_closed() {
    let api = Api::new("test", "test");
    let lines = rust_docs(&api, "Note:\n\n> first\n> second");
    assert_eq!(lines.last().map(String::as_str), Some("/// ```"));
    assert_eq!(lines.iter().filter(|l| l.contains("```")).count(), 2);
}

#[test]
fn test_trailing_period_stays_outside_autolink() {
    let api = Api::new("test", "test");
    assert_eq!(
        rust_docs(&api, "https://example.com."),
        vec!["/// <https://example.com>."]
    );
    assert_eq!(
        rust_docs(&api, "\"https://example.com.\""),
        vec!["/// \"<https://example.com>.\""]
    );
    assert_eq!(
        rust_docs(&api, "Use \"https://example.com\" here."),
        vec!["/// Use `https://example.com` here."]
    );
}

#[test]
fn test_duplicate_references_collapse() {
    let mut api = Api::new("test", "test");
    api.add_message(Message::new("Target", ".test.Target"));
    let lines = rust_docs(
        &api,
        "A [Target][test.Target] is a [target][test.Target].",
    );
    let definitions: Vec<_> = lines.iter().filter(|l| l.contains("]: ")).collect();
    assert_eq!(definitions, vec!["/// [test.Target]: crate::model::Target"]);
}

#[test]
fn test_fixture_docs_have_no_trailing_whitespace() {
    let api = common::secret_manager();
    for codec in codecs() {
        let mut state = ResolveState::new();
        for message in api.all_messages() {
            for line in format_docs(codec.as_ref(), &api, &message.documentation, &mut state) {
                assert_eq!(line.trim_end(), line);
                assert!(line.starts_with(codec.comment_prefix()));
            }
        }
    }
}

// ============================================================================
// Dependencies
// ============================================================================

#[test]
fn test_services_predicate_tracks_service_list() {
    let mut package = PackageOption::new("gax");
    package.used_if = Some(UsedIf::Services);
    let packages = [package];
    let resolver = DependencyResolver::new(&packages);
    let state = ResolveState::new();

    let mut api = Api::new("test", "test");
    api.add_message(Message::new("Request", ".test.Request"));
    assert!(!evaluate(UsedIf::Services, &api));
    assert!(resolver.resolve(&api, &state).dependencies.is_empty());

    api.add_service(Service::new("Service", ".test.Service"));
    assert!(evaluate(UsedIf::Services, &api));
    let names: Vec<_> = resolver
        .resolve(&api, &state)
        .dependencies
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["gax"]);
}

#[test]
fn test_ignored_package_is_never_emitted() {
    let mut package = PackageOption::new("wkt");
    package.force_used = true;
    package.ignore = true;
    let packages = [package];

    let mut state = ResolveState::new();
    state.mark_used("wkt");
    let api = Api::new("test", "test");
    assert!(DependencyResolver::new(&packages).resolve(&api, &state).dependencies.is_empty());
}
