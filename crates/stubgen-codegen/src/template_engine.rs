//! Template engine for stub generation using Handlebars.
//!
//! Provides a wrapper around Handlebars with the built-in Lua templates
//! pre-registered. Each built-in template can be replaced by a file of the
//! same name from a template directory.
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let context = json!({"function_name": "on_match_data", "event_key": "match_data"});
//! let lua = engine.render("realtime/event", &context).unwrap();
//! assert!(lua.contains("socket.events.match_data = fn"));
//! ```

use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::Path;
use stubgen_core::{Error, Result};
use tracing::debug;

/// Built-in templates as `(name, source)` pairs.
///
/// The override file for a template is `<name>.lua.hbs` below the template
/// directory.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "realtime/socket",
        include_str!("../templates/realtime/socket.lua.hbs"),
    ),
    (
        "realtime/message",
        include_str!("../templates/realtime/message.lua.hbs"),
    ),
    (
        "realtime/event",
        include_str!("../templates/realtime/event.lua.hbs"),
    ),
    (
        "rest/client",
        include_str!("../templates/rest/client.lua.hbs"),
    ),
    (
        "rest/endpoint",
        include_str!("../templates/rest/endpoint.lua.hbs"),
    ),
    (
        "rest/definition",
        include_str!("../templates/rest/definition.lua.hbs"),
    ),
    ("rest/enum", include_str!("../templates/rest/enum.lua.hbs")),
];

/// Template engine for stub generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        // Lua source, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        for (name, source) in BUILTIN_TEMPLATES {
            engine.register_template_string(name, source)?;
        }
        Ok(engine)
    }

    /// Creates an engine and applies overrides found in `dir`.
    ///
    /// Built-in templates without an override file are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if an override file cannot be read
    /// or does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::template_engine::TemplateEngine;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// std::fs::create_dir(dir.path().join("realtime")).unwrap();
    /// std::fs::write(dir.path().join("realtime/event.lua.hbs"), "-- {{function_name}}\n").unwrap();
    ///
    /// let engine = TemplateEngine::with_template_dir(dir.path()).unwrap();
    /// let lua = engine
    ///     .render("realtime/event", &serde_json::json!({"function_name": "on_party"}))
    ///     .unwrap();
    /// assert_eq!(lua, "-- on_party\n");
    /// ```
    pub fn with_template_dir(dir: &Path) -> Result<Self> {
        let mut engine = Self::new()?;
        for (name, _) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{name}.lua.hbs"));
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path).map_err(|e| Error::TemplateError {
                message: format!("Failed to read template override {}: {e}", path.display()),
            })?;
            engine.register_template_string(name, &source)?;
            debug!(template = name, path = %path.display(), "Registered template override");
        }
        Ok(engine)
    }

    /// Names of the built-in templates.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_TEMPLATES.iter().map(|(name, _)| *name)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Template name is not registered
    /// - Context cannot be serialized
    /// - Template rendering fails
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("Rendering '{template_name}' failed: {e}"),
            })
    }

    /// Registers a custom template, replacing any template of the same name.
    ///
    /// # Errors
    ///
    /// Returns error if template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::template_engine::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new().unwrap();
    /// engine.register_template_string("custom", "-- {{name}}").unwrap();
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("Failed to register template '{name}': {e}"),
            })
    }
}

impl Default for TemplateEngine<'_> {
    fn default() -> Self {
        Self::new().expect("Failed to create default TemplateEngine")
    }
}
