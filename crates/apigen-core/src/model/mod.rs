//! The API Model.
//!
//! An immutable-after-build schema of services, methods, messages, and enums,
//! plus ID-keyed lookup tables. Ownership flows top-down from [`Api`]: every
//! message, enum, and service lives in an arena owned by the `Api`, and
//! parent/child links are plain indices into those arenas. There are no
//! owning back-references.
//!
//! # Examples
//!
//! ```
//! use apigen_core::model::{Api, Field, Message, Typez};
//!
//! let mut api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
//! let secret = api.add_message(
//!     Message::new("Secret", ".google.cloud.secretmanager.v1.Secret")
//!         .with_field(Field::new("name", Typez::String)),
//! );
//!
//! assert_eq!(api.message(secret).name, "Secret");
//! assert!(api.state().message_index(".google.cloud.secretmanager.v1.Secret").is_some());
//! ```

mod api;
mod enums;
mod field;
mod message;
mod path;
mod service;
mod state;
mod well_known;

pub use api::{Api, MIXIN_PACKAGES};
pub use enums::{Enum, EnumValue};
pub use field::{Field, Typez, default_json_name};
pub use message::{Message, OneOf};
pub use path::{PathBinding, PathInfo, PathSegment, PathTemplate};
pub use service::{Method, OperationInfo, Service};
pub use state::{ApiState, EnumIndex, MessageIndex, ServiceIndex};
pub use well_known::{WELL_KNOWN_PACKAGE, well_known_messages};
