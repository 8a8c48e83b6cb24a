//! Messages and oneof groups.

use super::field::Field;
use super::state::{EnumIndex, MessageIndex};
use serde::{Deserialize, Serialize};

/// A message (record) type.
///
/// Nested messages and enums are stored in the owning [`Api`](super::Api)
/// arenas; a message only holds their indices. `parent` is a non-owning back
/// reference used for name qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Short name, e.g. `Secret`
    pub name: String,
    /// Globally unique dotted ID, e.g. `.google.cloud.secretmanager.v1.Secret`
    pub id: String,
    /// Source package; filled in from the `Api` or the parent when empty
    pub package: String,
    /// Free-text documentation in the API's Markdown dialect
    pub documentation: String,
    /// Fields in declaration order, including oneof members
    pub fields: Vec<Field>,
    /// Oneof groups declared by this message
    pub oneofs: Vec<OneOf>,
    /// Nested messages
    pub messages: Vec<MessageIndex>,
    /// Nested enums
    pub enums: Vec<EnumIndex>,
    /// Enclosing message, if nested
    pub parent: Option<MessageIndex>,
    /// Synthetic map entry message with exactly two fields, `key` and `value`
    pub is_map: bool,
    /// The message is the response of a paginated list method
    pub is_pageable_response: bool,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            package: String::new(),
            documentation: String::new(),
            fields: Vec::new(),
            oneofs: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            parent: None,
            is_map: false,
            is_pageable_response: false,
        }
    }

    /// Creates a map entry message with `key` and `value` fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::model::{Field, Message, Typez};
    ///
    /// let entry = Message::map_entry(
    ///     ".test.Fake.LabelsEntry",
    ///     Field::new("key", Typez::String),
    ///     Field::new("value", Typez::Int32),
    /// );
    /// assert!(entry.is_map);
    /// assert_eq!(entry.fields.len(), 2);
    /// ```
    #[must_use]
    pub fn map_entry(id: impl Into<String>, key: Field, value: Field) -> Self {
        let id = id.into();
        let name = id.rsplit('.').next().unwrap_or_default().to_string();
        let mut message = Self::new(name, id).with_field(key).with_field(value);
        message.is_map = true;
        message
    }

    /// Sets the source package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Appends a field, deriving its ID from the message ID.
    #[must_use]
    pub fn with_field(mut self, mut field: Field) -> Self {
        field.id = format!("{}.{}", self.id, field.name);
        self.fields.push(field);
        self
    }

    /// Appends a oneof group and its member fields.
    ///
    /// Member fields are flagged with `is_oneof` and appended to `fields`.
    #[must_use]
    pub fn with_oneof(mut self, name: impl Into<String>, members: Vec<Field>) -> Self {
        let name = name.into();
        let mut oneof = OneOf {
            id: format!("{}.{}", self.id, name),
            name,
            documentation: String::new(),
            fields: Vec::with_capacity(members.len()),
        };
        for mut field in members {
            field.is_oneof = true;
            field.id = format!("{}.{}", self.id, field.name);
            oneof.fields.push(self.fields.len());
            self.fields.push(field);
        }
        self.oneofs.push(oneof);
        self
    }

    /// Marks the message as the response of a paginated method.
    #[must_use]
    pub const fn pageable_response(mut self) -> Self {
        self.is_pageable_response = true;
        self
    }

    /// Finds a field by its source name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Finds a oneof group by its source name.
    #[must_use]
    pub fn oneof(&self, name: &str) -> Option<&OneOf> {
        self.oneofs.iter().find(|o| o.name == name)
    }

    /// Returns the oneof group owning `field`, if any.
    #[must_use]
    pub fn oneof_of(&self, field: &Field) -> Option<&OneOf> {
        if !field.is_oneof {
            return None;
        }
        self.oneofs
            .iter()
            .find(|o| {
                o.fields
                    .iter()
                    .any(|&i| self.fields.get(i).is_some_and(|f| f.name == field.name))
            })
    }

    /// Fields that are not members of any oneof, in declaration order.
    pub fn basic_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_oneof)
    }

    /// Returns the `key` and `value` fields of a map entry message.
    #[must_use]
    pub fn map_fields(&self) -> Option<(&Field, &Field)> {
        if !self.is_map {
            return None;
        }
        Some((self.field("key")?, self.field("value")?))
    }
}

/// A named set of mutually exclusive fields owned by one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOf {
    /// Source name of the group
    pub name: String,
    /// `<message id>.<name>`
    pub id: String,
    /// Free-text documentation
    pub documentation: String,
    /// Indices into the owning message's `fields`
    pub fields: Vec<usize>,
}

impl OneOf {
    /// Iterates over the member fields, given the owning message.
    pub fn members<'a>(&'a self, owner: &'a Message) -> impl Iterator<Item = &'a Field> {
        self.fields.iter().filter_map(|&i| owner.fields.get(i))
    }
}
