//! Enums and their values.

use super::state::MessageIndex;
use serde::{Deserialize, Serialize};

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// Short name
    pub name: String,
    /// Globally unique dotted ID
    pub id: String,
    /// Source package; filled in from the `Api` or the parent when empty
    pub package: String,
    /// Free-text documentation
    pub documentation: String,
    /// Values in declaration order
    pub values: Vec<EnumValue>,
    /// Enclosing message, if nested
    pub parent: Option<MessageIndex>,
}

impl Enum {
    /// Creates an enum without values.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            package: String::new(),
            documentation: String::new(),
            values: Vec::new(),
            parent: None,
        }
    }

    /// Appends a value, deriving its ID from the enum ID.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        let name = name.into();
        self.values.push(EnumValue {
            id: format!("{}.{}", self.id, name),
            name,
            number,
            documentation: String::new(),
        });
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Sets the source package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Finds a value by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// A single enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name as written in the IDL, usually `SCREAMING_SNAKE_CASE`
    pub name: String,
    /// `<enum id>.<name>`
    pub id: String,
    /// Numeric wire value
    pub number: i32,
    /// Free-text documentation
    pub documentation: String,
}
