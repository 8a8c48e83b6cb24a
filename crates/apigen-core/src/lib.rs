//! Core types, configuration, and errors for apigen.
//!
//! This crate provides the foundational types shared by every codec in the
//! workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - The API Model: an arena of messages, enums, and services addressed by
//!   index, plus ID-keyed lookup tables (`ApiState`)
//! - The well-known platform types pre-registered before resolution
//! - The codec configuration surface (`CodecOptions`, `GeneratorConfig`)
//! - The error hierarchy shared by all crates

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub mod model;

pub use config::{CodecOptions, GeneralConfig, GeneratorConfig, PackageOption, UsedIf};
pub use error::{Error, FileFailure, Result};
pub use model::{
    Api, ApiState, Enum, EnumIndex, EnumValue, Field, Message, MessageIndex, Method, OneOf,
    OperationInfo, PathBinding, PathInfo, PathSegment, PathTemplate, Service, ServiceIndex, Typez,
};
