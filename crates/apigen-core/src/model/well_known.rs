//! Well-known platform message types.
//!
//! Fields referencing these types resolve even when the source API does not
//! declare them.

use super::field::{Field, Typez};
use super::message::Message;

/// Source package of the well-known types.
pub const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Returns the well-known messages: `Timestamp`, `Duration`, `Empty`, `Any`
/// and `FieldMask`.
///
/// # Examples
///
/// ```
/// use apigen_core::model::well_known_messages;
///
/// let names: Vec<_> = well_known_messages().into_iter().map(|m| m.name).collect();
/// assert!(names.contains(&"FieldMask".to_string()));
/// ```
#[must_use]
pub fn well_known_messages() -> Vec<Message> {
    vec![
        well_known("Timestamp")
            .with_field(Field::new("seconds", Typez::Int64))
            .with_field(Field::new("nanos", Typez::Int32)),
        well_known("Duration")
            .with_field(Field::new("seconds", Typez::Int64))
            .with_field(Field::new("nanos", Typez::Int32)),
        well_known("Empty"),
        well_known("Any")
            .with_field(Field::new("type_url", Typez::String).with_json_name("@type"))
            .with_field(Field::new("value", Typez::Bytes)),
        well_known("FieldMask").with_field(Field::new("paths", Typez::String).repeated()),
    ]
}

fn well_known(name: &str) -> Message {
    Message::new(name, format!(".{WELL_KNOWN_PACKAGE}.{name}")).with_package(WELL_KNOWN_PACKAGE)
}
