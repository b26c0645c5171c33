//! Generation pipeline.
//!
//! Sequences extraction, resolution and emission for each surface. Entity
//! level problems are logged, recorded in the report and skipped; only
//! unreadable or unparseable documents and template failures stop a run.

use crate::descriptors::{EventDescriptor, MessageDescriptor};
use crate::emit::{RealtimeEmitter, RestEmitter};
use crate::io::{OutputSink, read_document};
use crate::manifest::{EventSource, Manifest};
use crate::openapi::{ApiDocument, resolve_document};
use crate::proto::ProtoDocument;
use crate::report::{GenerationReport, SkippedEntity};
use crate::template_engine::TemplateEngine;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use stubgen_core::{EntityKind, Error, Result};
use tracing::{info, warn};

/// Generated client surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Realtime socket module
    Realtime,
    /// REST client module
    Rest,
}

impl Surface {
    /// Returns the surface name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one generation.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Generated surface
    pub surface: Surface,
    /// Generated Lua source
    pub content: String,
    /// What was generated and skipped
    pub report: GenerationReport,
}

/// Input documents of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inputs {
    /// Realtime and API protocol descriptions
    Realtime {
        /// Realtime protocol description
        realtime: PathBuf,
        /// API protocol description
        api: PathBuf,
    },
    /// HTTP API description
    Rest {
        /// Swagger JSON document
        swagger: PathBuf,
    },
}

/// Stub generation pipeline.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::{Manifest, Pipeline};
///
/// let pipeline = Pipeline::new(Manifest::default()).unwrap();
/// let generation = pipeline
///     .generate_rest(r#"{"paths": {"/healthcheck": {"get": {"operationId": "Nakama_Healthcheck", "responses": {}}}}}"#)
///     .unwrap();
///
/// assert!(generation.content.contains("function M.healthcheck(client, callback"));
/// ```
#[derive(Debug)]
pub struct Pipeline {
    engine: TemplateEngine<'static>,
    manifest: Manifest,
}

impl Pipeline {
    /// Creates a pipeline using the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the manifest is invalid.
    pub fn new(manifest: Manifest) -> Result<Self> {
        Self::with_engine(manifest, TemplateEngine::new()?)
    }

    /// Creates a pipeline rendering with `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the manifest is invalid.
    pub fn with_engine(manifest: Manifest, engine: TemplateEngine<'static>) -> Result<Self> {
        manifest.validate()?;
        Ok(Self { engine, manifest })
    }

    /// Manifest in use.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Generates the realtime socket module.
    ///
    /// Messages are looked up in `realtime_proto`. Events are looked up in
    /// the document their manifest entry names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if rendering fails. Missing or
    /// malformed entities are skipped, not returned.
    pub fn generate_realtime(&self, realtime_proto: &str, api_proto: &str) -> Result<Generation> {
        let realtime = ProtoDocument::parse(realtime_proto);
        let api = ProtoDocument::parse(api_proto);
        let mut report = GenerationReport::new(Surface::Realtime);

        let mut messages: Vec<MessageDescriptor> =
            Vec::with_capacity(self.manifest.messages.len());
        for entry in &self.manifest.messages {
            match realtime.extract_message(&entry.name) {
                Ok(message) => {
                    let message = message.with_expects_response(entry.expects_response);
                    report.record_generated(EntityKind::Message, message.key().as_str());
                    messages.push(message);
                }
                Err(e) => skip_entity(&mut report, EntityKind::Message, &entry.name, e)?,
            }
        }

        let mut events: Vec<EventDescriptor> = Vec::with_capacity(self.manifest.events.len());
        for entry in &self.manifest.events {
            let document = match entry.source {
                EventSource::Realtime => &realtime,
                EventSource::Api => &api,
            };
            match document.extract_event(&entry.name) {
                Ok(event) => {
                    report.record_generated(EntityKind::Event, event.hook_name());
                    events.push(event);
                }
                Err(e) => skip_entity(&mut report, EntityKind::Event, &entry.name, e)?,
            }
        }

        let content = RealtimeEmitter::new(&self.engine).emit(&messages, &events)?;
        Ok(finish(Surface::Realtime, content, report))
    }

    /// Generates the REST client module.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if `api_json` does not parse and
    /// [`Error::TemplateError`] if rendering fails.
    pub fn generate_rest(&self, api_json: &str) -> Result<Generation> {
        self.generate_rest_named(api_json, "api description")
    }

    fn generate_rest_named(&self, api_json: &str, document_name: &str) -> Result<Generation> {
        let document = ApiDocument::from_json(api_json, document_name)?;
        let resolved = resolve_document(&document, &self.manifest.rest)?;

        let mut report = GenerationReport::new(Surface::Rest);
        for skip in resolved.skipped {
            report.record_skip(skip);
        }
        for definition in &resolved.definitions {
            if definition.has_enum() {
                report.record_generated(EntityKind::Definition, definition.name.as_str());
            } else if definition.has_properties() {
                report.record_generated(
                    EntityKind::Definition,
                    format!("create_{}", definition.name),
                );
            }
        }
        for endpoint in &resolved.endpoints {
            report.record_generated(EntityKind::Endpoint, endpoint.operation_id.as_str());
        }

        let content = RestEmitter::new(&self.engine).emit(
            &resolved.endpoints,
            &resolved.definitions,
            document.info(),
        )?;
        Ok(finish(Surface::Rest, content, report))
    }

    /// Reads `inputs`, generates their surface and writes it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputUnreadable`] or [`Error::InvalidDocument`] for
    /// bad inputs, [`Error::TemplateError`] for rendering failures and
    /// [`Error::OutputFailed`] if the sink cannot write.
    pub fn run(&self, inputs: &Inputs, sink: &mut dyn OutputSink) -> Result<GenerationReport> {
        let generation = match inputs {
            Inputs::Realtime { realtime, api } => {
                let realtime_text = read_document(realtime)?;
                let api_text = read_document(api)?;
                self.generate_realtime(&realtime_text, &api_text)?
            }
            Inputs::Rest { swagger } => {
                let text = read_document(swagger)?;
                self.generate_rest_named(&text, &swagger.display().to_string())?
            }
        };
        sink.write(generation.surface, &generation.content)?;
        Ok(generation.report)
    }
}

/// Records an entity error as a skip. Any other error is returned.
fn skip_entity(
    report: &mut GenerationReport,
    kind: EntityKind,
    name: &str,
    error: Error,
) -> Result<()> {
    if !error.is_entity_error() {
        return Err(error);
    }
    warn!(kind = %kind, name, error = %error, "Skipping entity");
    report.record_skip(SkippedEntity::new(kind, name, error.to_string()));
    Ok(())
}

fn finish(surface: Surface, content: String, mut report: GenerationReport) -> Generation {
    report.detect_collisions();
    report.bytes = content.len();
    info!(
        surface = %surface,
        generated = report.generated.len(),
        skipped = report.skipped.len(),
        bytes = report.bytes,
        "Generation complete"
    );
    Generation {
        surface,
        content,
        report,
    }
}
