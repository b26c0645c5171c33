//! Client stub generation from protocol descriptions.
//!
//! Turns a realtime protocol description (`.proto` text) and an HTTP API
//! description (Swagger JSON) into Lua client stubs using Handlebars
//! templates.
//!
//! # Pipeline
//!
//! ```text
//! .proto text ──► proto::ProtoDocument ──┐
//!                                        ├──► descriptors ──► emit ──► OutputSink
//! swagger JSON ──► openapi::resolve ─────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::{Manifest, MessageEntry, Pipeline};
//!
//! let manifest = Manifest {
//!     messages: vec![MessageEntry::new("Ping")],
//!     events: vec![],
//!     ..Manifest::default()
//! };
//! let pipeline = Pipeline::new(manifest).unwrap();
//! let generation = pipeline
//!     .generate_realtime("message Ping {\n  string text = 1;\n}\n", "")
//!     .unwrap();
//!
//! assert!(generation.content.contains("function M.ping(socket, text, callback)"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod descriptors;
pub mod emit;
pub mod io;
pub mod manifest;
pub mod openapi;
pub mod pipeline;
pub mod proto;
pub mod report;
pub mod template_engine;
pub mod type_map;

pub use descriptors::{
    DefinitionDescriptor, EndpointDescriptor, EventDescriptor, FieldDescriptor, HttpMethod,
    MessageDescriptor, ParameterDescriptor, ParameterLocation, PropertyDescriptor,
    ResponseDescriptor, StatusCode,
};
pub use io::{FileSink, MemorySink, OutputSink, StdoutSink, read_document};
pub use manifest::{EventEntry, EventSource, Manifest, MessageEntry, RestConfig};
pub use pipeline::{Generation, Inputs, Pipeline, Surface};
pub use report::{GeneratedEntity, GenerationReport, SkippedEntity};
pub use template_engine::TemplateEngine;
