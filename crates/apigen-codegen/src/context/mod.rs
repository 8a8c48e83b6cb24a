//! Template context construction.
//!
//! [`ContextBuilder`] walks the API Model once per run and produces an
//! [`ApiContext`] in which every name, type, and documentation line has
//! been resolved by the codec. Messages, enums, and services are visited
//! first; dependency resolution runs last, once the used-package set is
//! complete.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::{ContextBuilder, Target, codec_for};
//! use apigen_core::model::{Field, Message, Typez};
//! use apigen_core::{Api, CodecOptions};
//!
//! let mut api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
//! api.add_message(
//!     Message::new("Secret", ".google.cloud.secretmanager.v1.Secret")
//!         .with_field(Field::new("name", Typez::String)),
//! );
//!
//! let codec = codec_for(Target::Rust, CodecOptions::default());
//! let context = ContextBuilder::new(codec.as_ref(), &api).build();
//!
//! assert_eq!(context.messages[0].qualified_name, "crate::model::Secret");
//! assert_eq!(context.messages[0].fields[0].field_type, "std::string::String");
//! ```

mod types;

pub use types::{
    ApiContext, EnumContext, EnumValueContext, FieldContext, ImportContext, LroContext,
    MessageContext, MethodContext, OneOfContext, QueryParamContext, ServiceContext, VariantContext,
};

use crate::codec::Codec;
use crate::docs::format_docs;
use crate::packages::DependencyResolver;
use crate::paths::{http_path_args, http_path_format};
use crate::query::{add_query_parameter_expr, query_params};
use crate::state::{DiagnosticKind, ResolveState};
use crate::types::{children_scope, field_type, fq_enum_name, fq_message_name, is_map_field, join};
use apigen_core::model::{Enum, Field, Message, Method, OneOf, Service, Typez};
use apigen_core::Api;
use chrono::Datelike;

/// Builds the template context of one generation run.
#[derive(Debug)]
pub struct ContextBuilder<'a, C: Codec + ?Sized> {
    codec: &'a C,
    api: &'a Api,
    additional: serde_json::Value,
}

impl<'a, C: Codec + ?Sized> ContextBuilder<'a, C> {
    /// Creates a builder for `api` rendered by `codec`.
    #[must_use]
    pub const fn new(codec: &'a C, api: &'a Api) -> Self {
        Self {
            codec,
            api,
            additional: serde_json::Value::Null,
        }
    }

    /// Attaches caller-provided values, exposed to templates as
    /// `additional`.
    #[must_use]
    pub fn with_additional(mut self, additional: serde_json::Value) -> Self {
        self.additional = additional;
        self
    }

    /// Builds the context.
    ///
    /// Never fails: unresolvable references become empty type expressions
    /// and are listed in [`ApiContext::diagnostics`].
    #[must_use]
    pub fn build(&self) -> ApiContext {
        let codec = self.codec;
        let api = self.api;
        let options = codec.options();
        let mut state = ResolveState::new();

        tracing::debug!(api = %api.name, target = %codec.target(), "building template context");

        let docs = format_docs(codec, api, &api.description, &mut state);
        let messages = api
            .messages()
            .filter(|m| !m.is_map)
            .map(|m| self.message(m, &mut state))
            .collect();
        let enums = api.enums().map(|e| self.enumeration(e, &mut state)).collect();
        let services = api.services().map(|s| self.service(s, &mut state)).collect();

        let resolved = DependencyResolver::new(codec.packages()).resolve(api, &state);
        let imports = codec
            .packages()
            .iter()
            .filter(|p| !p.ignore && state.is_used(&p.alias))
            .map(|p| ImportContext {
                name: codec.package_qualifier(p),
                package: p.package.clone(),
            })
            .collect();

        ApiContext {
            name: api.name.clone(),
            title: api.title.clone(),
            description: api.description.clone(),
            package_name: codec.package_name(api),
            package_version: options.version.clone(),
            source_package: api.package_name.clone(),
            copyright_year: options.copyright_year.unwrap_or_else(current_year),
            not_for_publication: options.not_for_publication,
            deserialize_with_defaults: options.deserialize_with_defaults,
            docs,
            default_host: api
                .services()
                .next()
                .map(|s| s.default_host.clone())
                .unwrap_or_default(),
            messages,
            enums,
            services,
            dependencies: resolved.dependencies,
            imports,
            streaming_feature: resolved.streaming_feature,
            has_services: api.has_services(),
            has_lro: api.has_lro_methods(),
            has_streamed_responses: api.has_streamed_responses(),
            diagnostics: state.into_diagnostics(),
            additional: self.additional.clone(),
        }
    }

    fn message(&self, message: &Message, state: &mut ResolveState) -> MessageContext {
        let (codec, api) = (self.codec, self.api);

        let fields = message
            .basic_fields()
            .map(|f| self.field(f, state))
            .collect();
        let oneofs = message
            .oneofs
            .iter()
            .map(|o| self.oneof(message, o, state))
            .collect::<Vec<_>>();
        let messages = message
            .messages
            .iter()
            .map(|&i| api.message(i))
            .filter(|m| !m.is_map)
            .map(|m| self.message(m, state))
            .collect::<Vec<_>>();
        let enums = message
            .enums
            .iter()
            .map(|&i| self.enumeration(api.enum_type(i), state))
            .collect::<Vec<_>>();

        MessageContext {
            name: message.name.clone(),
            id: message.id.clone(),
            type_name: codec.type_name(&message.name),
            qualified_name: fq_message_name(codec, api, message, state),
            module_name: codec.module_name(&message.name),
            docs: format_docs(codec, api, &message.documentation, state),
            fields,
            has_nested_types: !(messages.is_empty() && enums.is_empty() && oneofs.is_empty()),
            oneofs,
            messages,
            enums,
            is_pageable_response: message.is_pageable_response,
        }
    }

    fn field(&self, field: &Field, state: &mut ResolveState) -> FieldContext {
        let (codec, api) = (self.codec, self.api);
        let is_map = is_map_field(api, field);
        FieldContext {
            name: field.name.clone(),
            field_name: codec.member_name(&field.name),
            json_name: field.json_name.clone(),
            field_type: field_type(codec, api, field, false, state),
            docs: format_docs(codec, api, &field.documentation, state),
            optional: field.optional,
            repeated: field.repeated,
            is_map,
            as_string: !is_map && is_wide_integer(field.typez),
        }
    }

    fn oneof(&self, owner: &Message, oneof: &OneOf, state: &mut ResolveState) -> OneOfContext {
        let (codec, api) = (self.codec, self.api);
        let type_name = codec.type_name(&oneof.name);
        let scope = children_scope(codec, api, owner, state);

        let variants = oneof
            .members(owner)
            .map(|field| VariantContext {
                name: field.name.clone(),
                variant_name: codec.to_pascal(&field.name),
                field_name: codec.member_name(&field.name),
                json_name: field.json_name.clone(),
                field_type: field_type(codec, api, field, false, state),
                docs: format_docs(codec, api, &field.documentation, state),
                as_string: is_wide_integer(field.typez),
            })
            .collect();

        OneOfContext {
            name: oneof.name.clone(),
            field_name: codec.member_name(&oneof.name),
            qualified_name: join(codec, &scope, &type_name),
            type_name,
            docs: format_docs(codec, api, &oneof.documentation, state),
            variants,
        }
    }

    fn enumeration(&self, value: &Enum, state: &mut ResolveState) -> EnumContext {
        let (codec, api) = (self.codec, self.api);
        EnumContext {
            name: value.name.clone(),
            id: value.id.clone(),
            type_name: codec.type_name(&value.name),
            qualified_name: fq_enum_name(codec, api, value, state),
            docs: format_docs(codec, api, &value.documentation, state),
            values: value
                .values
                .iter()
                .map(|v| EnumValueContext {
                    name: v.name.clone(),
                    const_name: codec.enum_value_name(&v.name),
                    number: v.number,
                    docs: format_docs(codec, api, &v.documentation, state),
                })
                .collect(),
        }
    }

    fn service(&self, service: &Service, state: &mut ResolveState) -> ServiceContext {
        let (codec, api) = (self.codec, self.api);
        ServiceContext {
            name: service.name.clone(),
            id: service.id.clone(),
            type_name: codec.type_name(&service.name),
            docs: format_docs(codec, api, &service.documentation, state),
            default_host: service.default_host.clone(),
            methods: service
                .methods
                .iter()
                .map(|m| self.method(m, state))
                .collect(),
        }
    }

    fn method(&self, method: &Method, state: &mut ResolveState) -> MethodContext {
        let (codec, api) = (self.codec, self.api);
        let binding = method.path_info.primary();

        let query_params = binding
            .map(|binding| {
                query_params(api, method, binding)
                    .into_iter()
                    .map(|field| QueryParamContext {
                        name: field.json_name.clone(),
                        statement: add_query_parameter_expr(codec, field),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let body = method.path_info.body_field_path.as_deref().map(|path| {
            let request = codec.request_variable();
            if path == "*" {
                request.to_string()
            } else {
                codec.member_access(request, &codec.member_name(path))
            }
        });

        let lro = method.operation_info.as_ref().map(|info| LroContext {
            response_type: self.message_type(&info.response_type_id, state),
            metadata_type: self.message_type(&info.metadata_type_id, state),
        });

        MethodContext {
            name: method.name.clone(),
            id: method.id.clone(),
            method_name: codec.method_name(&method.name),
            docs: format_docs(codec, api, &method.documentation, state),
            request_type: self.message_type(&method.input_type_id, state),
            response_type: self.message_type(&method.output_type_id, state),
            http_verb: binding.map(|b| b.verb.to_uppercase()).unwrap_or_default(),
            path_format: binding
                .map(|b| http_path_format(codec, &b.template))
                .unwrap_or_default(),
            path_args: http_path_args(codec, api, method, state),
            query_params,
            body,
            lro,
            is_pageable: api.is_pageable(method),
            server_streaming: method.server_streaming,
        }
    }

    fn message_type(&self, id: &str, state: &mut ResolveState) -> String {
        match self.api.message_by_id(id) {
            Some(message) => fq_message_name(self.codec, self.api, message, state),
            None => {
                state.diagnose(DiagnosticKind::UnresolvedType, id, "unknown message");
                String::new()
            }
        }
    }
}

const fn is_wide_integer(typez: Typez) -> bool {
    matches!(
        typez,
        Typez::Int64 | Typez::Uint64 | Typez::Sint64 | Typez::Fixed64 | Typez::Sfixed64
    )
}

fn current_year() -> u16 {
    u16::try_from(chrono::Utc::now().year()).unwrap_or_default()
}
