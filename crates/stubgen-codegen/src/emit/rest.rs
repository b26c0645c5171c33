use super::context::{ClientContext, DefinitionContext, EndpointContext, EnumContext};
use crate::descriptors::{DefinitionDescriptor, EndpointDescriptor};
use crate::openapi::Info;
use crate::template_engine::TemplateEngine;
use stubgen_core::Result;
use tracing::debug;

/// Renders the REST client module.
///
/// Enumerations become constants, definitions with properties become
/// constructors, endpoints become callers. A definition with neither
/// produces no output.
#[derive(Debug, Clone, Copy)]
pub struct RestEmitter<'e, 'a> {
    engine: &'e TemplateEngine<'a>,
}

impl<'e, 'a> RestEmitter<'e, 'a> {
    /// Creates an emitter rendering with `engine`.
    #[must_use]
    pub const fn new(engine: &'e TemplateEngine<'a>) -> Self {
        Self { engine }
    }

    /// Renders one endpoint caller.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_endpoint(&self, endpoint: &EndpointDescriptor) -> Result<String> {
        self.engine
            .render("rest/endpoint", &EndpointContext::from(endpoint))
    }

    /// Renders one definition constructor.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_definition(&self, definition: &DefinitionDescriptor) -> Result<String> {
        self.engine
            .render("rest/definition", &DefinitionContext::from(definition))
    }

    /// Renders the constants of one enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_enum(&self, definition: &DefinitionDescriptor) -> Result<String> {
        self.engine
            .render("rest/enum", &EnumContext::from(definition))
    }

    /// Renders the complete client module.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if any template fails.
    pub fn emit(
        &self,
        endpoints: &[EndpointDescriptor],
        definitions: &[DefinitionDescriptor],
        info: &Info,
    ) -> Result<String> {
        let mut enums = String::new();
        let mut objects = String::new();
        for definition in definitions {
            if definition.has_enum() {
                enums.push_str(&self.render_enum(definition)?);
            } else if definition.has_properties() {
                objects.push_str(&self.render_definition(definition)?);
            } else {
                debug!(definition = %definition.raw_name, "No properties or values, nothing to emit");
            }
        }

        let endpoints = endpoints
            .iter()
            .map(|endpoint| self.render_endpoint(endpoint))
            .collect::<Result<String>>()?;

        self.engine.render(
            "rest/client",
            &ClientContext {
                title: info.title.clone().unwrap_or_default(),
                version: info.version.clone().unwrap_or_default(),
                enums,
                objects,
                endpoints,
            },
        )
    }
}
