//! Query parameter resolution.
//!
//! Selects the request fields sent as query parameters and classifies each
//! one by presence and value kind. The classification is shared; each codec
//! renders it in its own client syntax.

use crate::codec::Codec;
use apigen_core::model::{Field, Method, PathBinding, Typez};
use apigen_core::Api;
use serde::Serialize;

/// How many values a query parameter carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Always sent
    Required,
    /// Sent only when set
    Optional,
    /// Sent once per element
    Repeated,
}

/// How a query parameter value is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryValue {
    /// Sent as-is
    Scalar,
    /// Sent as the enum's wire value
    Enum,
    /// Serialized to a JSON value and flattened into parameters
    Message,
}

/// A classified query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    /// Wire name, the field's JSON name
    pub name: String,
    /// Expression reading the field from the request
    pub accessor: String,
    /// Presence class
    pub presence: Presence,
    /// Value class
    pub value: QueryValue,
}

/// Request fields sent as query parameters for `binding`.
///
/// These are the top-level request fields named in the binding's query
/// parameter set, in declaration order, minus the fields bound by path
/// variables and the body field. A whole-request body (`*`) leaves nothing
/// for the query string.
#[must_use]
pub fn query_params<'a>(api: &'a Api, method: &Method, binding: &PathBinding) -> Vec<&'a Field> {
    let Some(request) = api.message_by_id(&method.input_type_id) else {
        return Vec::new();
    };
    let body = method.path_info.body_field_path.as_deref();
    if body == Some("*") {
        return Vec::new();
    }
    let path_fields = binding.path_fields();
    request
        .fields
        .iter()
        .filter(|f| binding.query_parameters.contains(&f.name))
        .filter(|f| !path_fields.contains(f.name.as_str()))
        .filter(|f| body != Some(f.name.as_str()))
        .collect()
}

/// Classifies `field` as a query parameter.
pub fn query_parameter<C: Codec + ?Sized>(codec: &C, field: &Field) -> QueryParameter {
    let presence = if field.repeated {
        Presence::Repeated
    } else if field.optional || field.is_oneof {
        Presence::Optional
    } else {
        Presence::Required
    };
    let value = match field.typez {
        Typez::Message => QueryValue::Message,
        Typez::Enum => QueryValue::Enum,
        _ => QueryValue::Scalar,
    };
    QueryParameter {
        name: field.json_name.clone(),
        accessor: codec.member_access(codec.request_variable(), &codec.member_name(&field.name)),
        presence,
        value,
    }
}

/// Statement adding `field` to the request's query string.
pub fn add_query_parameter_expr<C: Codec + ?Sized>(codec: &C, field: &Field) -> String {
    codec.query_parameter_expr(&query_parameter(codec, field))
}
