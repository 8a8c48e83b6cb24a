//! Arena indices and ID-keyed lookup tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

macro_rules! arena_index {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(usize);

        impl $name {
            pub(crate) const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the position in the owning arena.
            #[inline]
            #[must_use]
            pub const fn get(self) -> usize {
                self.0
            }
        }
    };
}

arena_index!(
    /// Index of a message in the [`Api`](super::Api) arena.
    MessageIndex
);
arena_index!(
    /// Index of an enum in the [`Api`](super::Api) arena.
    EnumIndex
);
arena_index!(
    /// Index of a service in the [`Api`](super::Api) arena.
    ServiceIndex
);

/// ID-keyed lookup tables over the model arenas.
///
/// Every cross-reference in a finished model (a field's `typez_id`, a method's
/// input and output IDs) resolves through these tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiState {
    message_by_id: HashMap<String, MessageIndex>,
    enum_by_id: HashMap<String, EnumIndex>,
    service_by_id: HashMap<String, ServiceIndex>,
    method_by_id: HashMap<String, (ServiceIndex, usize)>,
}

impl ApiState {
    /// Looks up a message by ID.
    #[must_use]
    pub fn message_index(&self, id: &str) -> Option<MessageIndex> {
        self.message_by_id.get(id).copied()
    }

    /// Looks up an enum by ID.
    #[must_use]
    pub fn enum_index(&self, id: &str) -> Option<EnumIndex> {
        self.enum_by_id.get(id).copied()
    }

    /// Looks up a service by ID.
    #[must_use]
    pub fn service_index(&self, id: &str) -> Option<ServiceIndex> {
        self.service_by_id.get(id).copied()
    }

    /// Looks up a method by ID, returning its service and position.
    #[must_use]
    pub fn method_position(&self, id: &str) -> Option<(ServiceIndex, usize)> {
        self.method_by_id.get(id).copied()
    }

    /// Number of registered messages, including well-known types.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.message_by_id.len()
    }

    pub(crate) fn insert_message(&mut self, id: &str, index: MessageIndex) {
        self.message_by_id.insert(id.to_string(), index);
    }

    pub(crate) fn insert_enum(&mut self, id: &str, index: EnumIndex) {
        self.enum_by_id.insert(id.to_string(), index);
    }

    pub(crate) fn insert_service(&mut self, id: &str, index: ServiceIndex) {
        self.service_by_id.insert(id.to_string(), index);
    }

    pub(crate) fn insert_method(&mut self, id: &str, service: ServiceIndex, position: usize) {
        self.method_by_id.insert(id.to_string(), (service, position));
    }
}
