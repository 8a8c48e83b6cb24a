//! Cross-reference resolution.
//!
//! Documentation refers to model elements with reference links whose ID is
//! the element's source ID without its leading dot, e.g.
//! `[Secret][google.cloud.secretmanager.v1.Secret]`. Each ID is looked up
//! in priority order: message, enum, method, service, then members (field,
//! oneof member, oneof group, enum value) by splitting off the last
//! component. IDs that resolve to nothing are dropped.

use crate::codec::Codec;
use crate::state::ResolveState;
use crate::types::{children_scope, fq_enum_name, fq_message_name, join, package_qualifier};
use apigen_core::model::{Method, Service};
use apigen_core::Api;
use std::collections::BTreeSet;

/// Definition lines for every resolvable ID, sorted by ID.
pub(crate) fn link_definitions<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    ids: &BTreeSet<String>,
    state: &mut ResolveState,
) -> Vec<String> {
    ids.iter()
        .filter_map(|id| {
            let target = resolve_link(codec, api, id, state);
            if target.is_none() {
                tracing::debug!(id, "dropping unresolved documentation link");
            }
            target.map(|target| codec.link_definition(id, &target))
        })
        .collect()
}

/// Resolves a link ID to its target path.
pub(crate) fn resolve_link<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    id: &str,
    state: &mut ResolveState,
) -> Option<String> {
    let id = format!(".{id}");
    if let Some(message) = api.message_by_id(&id) {
        return Some(fq_message_name(codec, api, message, state));
    }
    if let Some(value) = api.enum_by_id(&id) {
        return Some(fq_enum_name(codec, api, value, state));
    }
    if let Some((service, method)) = api.method_by_id(&id) {
        return Some(method_link(codec, api, service, method, state));
    }
    if let Some(service) = api.service_by_id(&id) {
        return Some(service_link(codec, api, service, state));
    }

    let (parent, leaf) = id.rsplit_once('.')?;
    if let Some(message) = api.message_by_id(parent) {
        if let Some(field) = message.field(leaf) {
            if let Some(oneof) = message.oneof_of(field) {
                let scope = children_scope(codec, api, message, state);
                let group = join(codec, &scope, &codec.type_name(&oneof.name));
                return Some(join(codec, &group, &codec.type_name(&field.name)));
            }
            let owner = fq_message_name(codec, api, message, state);
            return Some(join(codec, &owner, &codec.member_name(&field.name)));
        }
        if let Some(oneof) = message.oneof(leaf) {
            let scope = children_scope(codec, api, message, state);
            return Some(join(codec, &scope, &codec.type_name(&oneof.name)));
        }
    }
    if let Some(value) = api.enum_by_id(parent)
        && let Some(constant) = value.value(leaf)
    {
        let owner = fq_enum_name(codec, api, value, state);
        return Some(join(codec, &owner, &codec.enum_value_name(&constant.name)));
    }
    None
}

fn service_link<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    service: &Service,
    state: &mut ResolveState,
) -> String {
    let qualifier = package_qualifier(codec, api, &service.package, state);
    let scope = codec.client_qualifier(qualifier.as_deref());
    join(codec, &scope, &codec.type_name(&service.name))
}

fn method_link<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    service: &Service,
    method: &Method,
    state: &mut ResolveState,
) -> String {
    let service = service_link(codec, api, service, state);
    join(codec, &service, &codec.method_name(&method.name))
}
