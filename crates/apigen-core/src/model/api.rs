//! The API root and its arenas.

use super::enums::Enum;
use super::field::Typez;
use super::message::Message;
use super::service::{Method, Service};
use super::state::{ApiState, EnumIndex, MessageIndex, ServiceIndex};
use super::well_known::well_known_messages;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Source packages that may appear next to the API's own package.
///
/// These are mixin services and their messages, generated into every client
/// that declares them.
pub const MIXIN_PACKAGES: &[&str] = &["google.cloud.location", "google.iam.v1", "google.longrunning"];

/// The root of the API Model.
///
/// Owns every message, enum, and service. Top-level elements are the ones
/// declared by the source API; messages and enums registered as external
/// (including the well-known types) are resolvable but are not part of the
/// generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    /// Short name, e.g. `secretmanager`
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Free-text description in the API's Markdown dialect
    pub description: String,
    /// Source package of the API, e.g. `google.cloud.secretmanager.v1`
    pub package_name: String,
    message_arena: Vec<Message>,
    enum_arena: Vec<Enum>,
    service_arena: Vec<Service>,
    top_messages: Vec<MessageIndex>,
    top_enums: Vec<EnumIndex>,
    state: ApiState,
}

impl Api {
    /// Creates an empty API.
    #[must_use]
    pub fn new(name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            description: String::new(),
            package_name: package_name.into(),
            message_arena: Vec::new(),
            enum_arena: Vec::new(),
            service_arena: Vec::new(),
            top_messages: Vec::new(),
            top_enums: Vec::new(),
            state: ApiState::default(),
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a top-level message.
    pub fn add_message(&mut self, message: Message) -> MessageIndex {
        let index = self.register_message(message, None);
        self.top_messages.push(index);
        index
    }

    /// Adds a message nested inside `parent`.
    pub fn add_nested_message(&mut self, parent: MessageIndex, message: Message) -> MessageIndex {
        let index = self.register_message(message, Some(parent));
        self.message_arena[parent.get()].messages.push(index);
        index
    }

    /// Registers a message that is referenced by the API but not declared by it.
    ///
    /// Registering the same ID twice is a no-op that returns the existing index.
    pub fn register_external_message(&mut self, message: Message) -> MessageIndex {
        if let Some(existing) = self.state.message_index(&message.id) {
            return existing;
        }
        self.register_message(message, None)
    }

    /// Adds a top-level enum.
    pub fn add_enum(&mut self, value: Enum) -> EnumIndex {
        let index = self.register_enum(value, None);
        self.top_enums.push(index);
        index
    }

    /// Adds an enum nested inside `parent`.
    pub fn add_nested_enum(&mut self, parent: MessageIndex, value: Enum) -> EnumIndex {
        let index = self.register_enum(value, Some(parent));
        self.message_arena[parent.get()].enums.push(index);
        index
    }

    /// Registers an enum that is referenced by the API but not declared by it.
    pub fn register_external_enum(&mut self, value: Enum) -> EnumIndex {
        if let Some(existing) = self.state.enum_index(&value.id) {
            return existing;
        }
        self.register_enum(value, None)
    }

    /// Adds a service and registers its methods.
    pub fn add_service(&mut self, mut service: Service) -> ServiceIndex {
        if service.package.is_empty() {
            service.package.clone_from(&self.package_name);
        }
        let index = ServiceIndex::new(self.service_arena.len());
        self.state.insert_service(&service.id, index);
        for (position, method) in service.methods.iter().enumerate() {
            self.state.insert_method(&method.id, index, position);
        }
        self.service_arena.push(service);
        index
    }

    /// Injects the well-known platform messages into the lookup tables.
    ///
    /// Idempotent: IDs that are already registered are left untouched.
    pub fn load_well_known_types(&mut self) {
        for message in well_known_messages() {
            self.register_external_message(message);
        }
    }

    /// Returns the lookup tables.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// Returns the message at `index`.
    #[must_use]
    pub fn message(&self, index: MessageIndex) -> &Message {
        &self.message_arena[index.get()]
    }

    /// Returns the enum at `index`.
    #[must_use]
    pub fn enum_type(&self, index: EnumIndex) -> &Enum {
        &self.enum_arena[index.get()]
    }

    /// Returns the service at `index`.
    #[must_use]
    pub fn service(&self, index: ServiceIndex) -> &Service {
        &self.service_arena[index.get()]
    }

    /// Top-level messages in declaration order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.top_messages.iter().map(|&i| self.message(i))
    }

    /// Top-level enums in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.top_enums.iter().map(|&i| self.enum_type(i))
    }

    /// Services in declaration order.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.service_arena.iter()
    }

    /// Every registered message, nested and external ones included.
    pub fn all_messages(&self) -> impl Iterator<Item = &Message> {
        self.message_arena.iter()
    }

    /// Every method of every service.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.service_arena.iter().flat_map(|s| s.methods.iter())
    }

    /// Looks up a message by ID.
    #[must_use]
    pub fn message_by_id(&self, id: &str) -> Option<&Message> {
        self.state.message_index(id).map(|i| self.message(i))
    }

    /// Looks up an enum by ID.
    #[must_use]
    pub fn enum_by_id(&self, id: &str) -> Option<&Enum> {
        self.state.enum_index(id).map(|i| self.enum_type(i))
    }

    /// Looks up a service by ID.
    #[must_use]
    pub fn service_by_id(&self, id: &str) -> Option<&Service> {
        self.state.service_index(id).map(|i| self.service(i))
    }

    /// Looks up a method by ID, returning it with its service.
    #[must_use]
    pub fn method_by_id(&self, id: &str) -> Option<(&Service, &Method)> {
        let (service, position) = self.state.method_position(id)?;
        let service = self.service(service);
        service.methods.get(position).map(|m| (service, m))
    }

    /// Returns `true` if at least one service is declared.
    #[must_use]
    pub fn has_services(&self) -> bool {
        !self.service_arena.is_empty()
    }

    /// Returns `true` if at least one method is a long-running operation.
    #[must_use]
    pub fn has_lro_methods(&self) -> bool {
        self.methods().any(|m| m.operation_info.is_some())
    }

    /// Returns `true` if the method returns a paginated response.
    #[must_use]
    pub fn is_pageable(&self, method: &Method) -> bool {
        self.message_by_id(&method.output_type_id)
            .is_some_and(|m| m.is_pageable_response)
    }

    /// Returns `true` if at least one method is paginated or server-streaming.
    #[must_use]
    pub fn has_streamed_responses(&self) -> bool {
        self.methods()
            .any(|m| m.server_streaming || self.is_pageable(m))
    }

    /// Returns the single source package of the top-level elements.
    ///
    /// Elements from [`MIXIN_PACKAGES`] are ignored. An API with no
    /// non-mixin elements reports its own `package_name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MixedPackages` if more than one package remains.
    pub fn single_package(&self) -> Result<String> {
        let packages: BTreeSet<&str> = self
            .messages()
            .map(|m| m.package.as_str())
            .chain(self.enums().map(|e| e.package.as_str()))
            .chain(self.services().map(|s| s.package.as_str()))
            .filter(|p| !MIXIN_PACKAGES.contains(p))
            .collect();

        match packages.len() {
            0 => Ok(self.package_name.clone()),
            1 => Ok(packages.into_iter().next().unwrap_or_default().to_string()),
            _ => Err(Error::MixedPackages {
                packages: packages.into_iter().map(String::from).collect(),
            }),
        }
    }

    /// Checks that every map message is well formed.
    ///
    /// Cross-references that do not resolve are logged and left to the
    /// resolvers, which report them as diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `Error::ModelError` describing the first malformed map message.
    pub fn validate(&self) -> Result<()> {
        if let Some(message) = self
            .message_arena
            .iter()
            .find(|m| m.is_map && m.map_fields().is_none())
        {
            return Err(model_error(format!(
                "map message {} must have exactly `key` and `value` fields",
                message.id
            )));
        }
        for reference in self.unresolved_references() {
            tracing::warn!(reference = %reference, "unresolved type reference");
        }
        Ok(())
    }

    /// Lists the field and method references whose target is not in the
    /// model, as `<element id> -> <referenced id>`.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut unresolved = Vec::new();
        for message in &self.message_arena {
            for field in &message.fields {
                let resolves = match field.typez {
                    Typez::Message => field
                        .typez_id
                        .as_deref()
                        .is_some_and(|id| self.state.message_index(id).is_some()),
                    Typez::Enum => field
                        .typez_id
                        .as_deref()
                        .is_some_and(|id| self.state.enum_index(id).is_some()),
                    _ => true,
                };
                if !resolves {
                    unresolved.push(format!(
                        "{} -> {}",
                        field.id,
                        field.typez_id.as_deref().unwrap_or("<none>")
                    ));
                }
            }
        }
        for method in self.methods() {
            for id in [&method.input_type_id, &method.output_type_id] {
                if self.state.message_index(id).is_none() {
                    unresolved.push(format!("{} -> {id}", method.id));
                }
            }
        }
        unresolved
    }

    fn register_message(&mut self, mut message: Message, parent: Option<MessageIndex>) -> MessageIndex {
        if message.package.is_empty() {
            message.package = parent.map_or_else(
                || self.package_name.clone(),
                |p| self.message(p).package.clone(),
            );
        }
        message.parent = parent;
        let index = MessageIndex::new(self.message_arena.len());
        self.state.insert_message(&message.id, index);
        self.message_arena.push(message);
        index
    }

    fn register_enum(&mut self, mut value: Enum, parent: Option<MessageIndex>) -> EnumIndex {
        if value.package.is_empty() {
            value.package = parent.map_or_else(
                || self.package_name.clone(),
                |p| self.message(p).package.clone(),
            );
        }
        value.parent = parent;
        let index = EnumIndex::new(self.enum_arena.len());
        self.state.insert_enum(&value.id, index);
        self.enum_arena.push(value);
        index
    }
}

fn model_error(message: String) -> Error {
    Error::ModelError { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, OperationInfo, PathBinding, PathInfo, PathTemplate};

    fn get_info() -> PathInfo {
        PathInfo::new(PathBinding::new(
            "GET",
            PathTemplate::new().literal("v1").field("name"),
        ))
    }

    #[test]
    fn test_nested_messages_inherit_package_and_parent() {
        let mut api = Api::new("test", "test.v1");
        let outer = api.add_message(Message::new("Outer", ".test.v1.Outer"));
        let inner = api.add_nested_message(outer, Message::new("Inner", ".test.v1.Outer.Inner"));

        assert_eq!(api.message(inner).parent, Some(outer));
        assert_eq!(api.message(inner).package, "test.v1");
        assert_eq!(api.message(outer).messages, vec![inner]);
        assert_eq!(api.messages().count(), 1);
        assert_eq!(api.all_messages().count(), 2);
    }

    #[test]
    fn test_load_well_known_types_is_idempotent() {
        let mut api = Api::new("test", "test.v1");
        api.load_well_known_types();
        let count = api.state().message_count();
        api.load_well_known_types();

        assert_eq!(api.state().message_count(), count);
        assert!(api.message_by_id(".google.protobuf.Timestamp").is_some());
        assert!(api.message_by_id(".google.protobuf.FieldMask").is_some());
        assert_eq!(api.messages().count(), 0);
    }

    #[test]
    fn test_method_lookup() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(Message::new("Request", ".test.v1.Request"));
        api.add_service(
            Service::new("Service", ".test.v1.Service").with_method(Method::new(
                "GetThing",
                ".test.v1.Request",
                ".test.v1.Request",
                get_info(),
            )),
        );

        let (service, method) = api.method_by_id(".test.v1.Service.GetThing").unwrap();
        assert_eq!(service.name, "Service");
        assert_eq!(method.name, "GetThing");
        assert!(api.has_services());
        assert!(!api.has_lro_methods());
    }

    #[test]
    fn test_lro_and_pagination_predicates() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(Message::new("Request", ".test.v1.Request"));
        api.add_message(Message::new("Response", ".test.v1.Response").pageable_response());
        api.add_service(
            Service::new("Service", ".test.v1.Service")
                .with_method(Method::new("List", ".test.v1.Request", ".test.v1.Response", get_info()))
                .with_method(
                    Method::new("Create", ".test.v1.Request", ".test.v1.Request", get_info())
                        .with_operation(OperationInfo {
                            response_type_id: ".test.v1.Request".to_string(),
                            metadata_type_id: ".test.v1.Request".to_string(),
                        }),
                ),
        );

        assert!(api.has_lro_methods());
        assert!(api.has_streamed_responses());
    }

    #[test]
    fn test_single_package_ignores_mixins() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(Message::new("Thing", ".test.v1.Thing"));
        api.add_message(Message::new("Location", ".google.cloud.location.Location").with_package("google.cloud.location"));

        assert_eq!(api.single_package().unwrap(), "test.v1");
    }

    #[test]
    fn test_single_package_rejects_mixed_packages() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(Message::new("Thing", ".test.v1.Thing"));
        api.add_message(Message::new("Other", ".other.v1.Other").with_package("other.v1"));

        let err = api.single_package().unwrap_err();
        assert!(err.is_mixed_packages());
    }

    #[test]
    fn test_dangling_reference_is_not_a_model_error() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(
            Message::new("Thing", ".test.v1.Thing")
                .with_field(Field::new("other", Typez::Message).with_type_id(".test.v1.Missing")),
        );

        assert!(api.validate().is_ok());
        assert_eq!(
            api.unresolved_references(),
            vec![".test.v1.Thing.other -> .test.v1.Missing".to_string()]
        );
    }

    #[test]
    fn test_malformed_map_message_is_a_model_error() {
        let mut entry = Message::new("LabelsEntry", ".test.v1.LabelsEntry")
            .with_field(Field::new("key", Typez::String));
        entry.is_map = true;
        let mut api = Api::new("test", "test.v1");
        api.add_message(entry);

        let err = api.validate().unwrap_err();
        assert!(err.is_model_error());
        assert!(err.to_string().contains(".test.v1.LabelsEntry"));
    }

    #[test]
    fn test_well_known_references_resolve_after_loading() {
        let mut api = Api::new("test", "test.v1");
        api.add_message(
            Message::new("Thing", ".test.v1.Thing").with_field(
                Field::new("create_time", Typez::Message)
                    .with_type_id(".google.protobuf.Timestamp")
                    .optional(),
            ),
        );
        assert_eq!(api.unresolved_references().len(), 1);

        api.load_well_known_types();
        assert!(api.unresolved_references().is_empty());
    }
}
