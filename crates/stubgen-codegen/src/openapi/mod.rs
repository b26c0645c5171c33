//! HTTP API description handling.
//!
//! [`document`] deserializes a Swagger 2 style JSON document while keeping
//! declaration order. [`resolver`] turns it into endpoint and definition
//! descriptors.

pub mod document;
pub mod resolver;

pub use document::{ApiDocument, Info, Operation, Parameter, Response, Schema};
pub use resolver::{
    ResolvedApi, resolve_definition, resolve_document, resolve_endpoint, resolve_ref,
};
