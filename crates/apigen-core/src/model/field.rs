//! Fields and their type tags.

use serde::{Deserialize, Serialize};

/// The type tag of a field, mirroring the protobuf wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Typez {
    /// 64-bit IEEE float
    Double,
    /// 32-bit IEEE float
    Float,
    /// Signed 64-bit varint
    Int64,
    /// Unsigned 64-bit varint
    Uint64,
    /// Signed 32-bit varint
    Int32,
    /// Unsigned fixed 64-bit
    Fixed64,
    /// Unsigned fixed 32-bit
    Fixed32,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Proto2 group (unsupported by every codec)
    Group,
    /// Reference to a message, see [`Field::typez_id`]
    Message,
    /// Opaque bytes
    Bytes,
    /// Unsigned 32-bit varint
    Uint32,
    /// Reference to an enum, see [`Field::typez_id`]
    Enum,
    /// Signed fixed 32-bit
    Sfixed32,
    /// Signed fixed 64-bit
    Sfixed64,
    /// Zig-zag encoded 32-bit
    Sint32,
    /// Zig-zag encoded 64-bit
    Sint64,
}

impl Typez {
    /// Returns `true` for every tag that is neither a message, an enum, nor a group.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Message | Self::Enum | Self::Group)
    }
}

/// A field of a message.
///
/// # Examples
///
/// ```
/// use apigen_core::model::{Field, Typez};
///
/// let field = Field::new("update_mask", Typez::Message)
///     .with_type_id(".google.protobuf.FieldMask")
///     .optional();
///
/// assert_eq!(field.json_name, "updateMask");
/// assert!(field.optional);
/// assert!(!field.repeated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Name as written in the source IDL (usually `snake_case`)
    pub name: String,
    /// Name used on the JSON wire
    pub json_name: String,
    /// Fully qualified ID, `<message id>.<name>`; filled in by `Message::with_field`
    pub id: String,
    /// Free-text documentation in the API's Markdown dialect
    pub documentation: String,
    /// Type tag
    pub typez: Typez,
    /// Referenced message or enum ID when `typez` is `Message` or `Enum`
    pub typez_id: Option<String>,
    /// Explicit presence
    pub optional: bool,
    /// Repeated (list) field
    pub repeated: bool,
    /// Member of a oneof group
    pub is_oneof: bool,
    /// The field's type (directly or transitively) contains the field's message
    pub recursive: bool,
    /// Field synthesized by the parser rather than declared in the source
    pub synthetic: bool,
}

impl Field {
    /// Creates a singular, non-optional field with a default JSON name.
    #[must_use]
    pub fn new(name: impl Into<String>, typez: Typez) -> Self {
        let name = name.into();
        Self {
            json_name: default_json_name(&name),
            name,
            id: String::new(),
            documentation: String::new(),
            typez,
            typez_id: None,
            optional: false,
            repeated: false,
            is_oneof: false,
            recursive: false,
            synthetic: false,
        }
    }

    /// Sets the referenced message or enum ID.
    #[must_use]
    pub fn with_type_id(mut self, id: impl Into<String>) -> Self {
        self.typez_id = Some(id.into());
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Overrides the JSON wire name.
    #[must_use]
    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    /// Marks the field as having explicit presence.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the field as repeated.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Marks the field as (transitively) self-referencing.
    #[must_use]
    pub const fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Marks the field as synthesized.
    #[must_use]
    pub const fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// Computes the protobuf default JSON name: underscores are dropped and the
/// following character is upper-cased.
///
/// # Examples
///
/// ```
/// use apigen_core::model::default_json_name;
///
/// assert_eq!(default_json_name("page_size"), "pageSize");
/// assert_eq!(default_json_name("name"), "name");
/// ```
#[must_use]
pub fn default_json_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;

    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(ch.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}
