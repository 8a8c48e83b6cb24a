//! Codec engine and package generation for apigen.
//!
//! Turns an API Model into a client package for one target language. The
//! engine is split into resolvers shared by every target and a [`Codec`]
//! per target supplying the syntax they need:
//!
//! - [`naming`]: case conversion and keyword escaping
//! - [`types`]: field types and fully qualified names
//! - [`docs`]: documentation comments with resolved cross-references
//! - [`paths`] and [`query`]: HTTP path formats, accessors, and query
//!   parameters
//! - [`packages`]: dependencies of the generated package
//!
//! [`ContextBuilder`] assembles their output into a serializable context,
//! and [`Generator`] renders it with Handlebars templates.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::{Target, codec_for};
//! use apigen_core::CodecOptions;
//!
//! let codec = codec_for(Target::TypeScript, CodecOptions::default());
//! assert_eq!(codec.to_camel("page_token"), "pageToken");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod codec;
mod context;
mod generator;
mod output;
mod state;
mod template_engine;

pub mod docs;
pub mod naming;
pub mod packages;
pub mod paths;
pub mod query;
pub mod rust;
pub mod types;
pub mod typescript;

pub use codec::{Codec, OutputTemplate, Target, codec_for, merge_packages};
pub use context::{
    ApiContext, ContextBuilder, EnumContext, EnumValueContext, FieldContext, ImportContext,
    LroContext, MessageContext, MethodContext, OneOfContext, QueryParamContext, ServiceContext,
    VariantContext,
};
pub use generator::{GenerationReport, Generator, RenderOutput};
pub use output::{GeneratedCode, GeneratedFile};
pub use state::{Diagnostic, DiagnosticKind, ResolveState};
pub use template_engine::TemplateEngine;
