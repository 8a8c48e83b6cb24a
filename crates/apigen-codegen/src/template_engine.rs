//! Template engine for package generation using Handlebars.
//!
//! Provides a wrapper around Handlebars with the output templates of every
//! target pre-registered. Templates run in strict mode, so a reference to a
//! key missing from the context is a rendering error, and output is never
//! HTML-escaped.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "// {{name}} <generated>").unwrap();
//! let rendered = engine.render("greeting", &json!({"name": "secretmanager"})).unwrap();
//! assert_eq!(rendered, "// secretmanager <generated>");
//! ```

use apigen_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Output templates of every target, keyed by the names codecs list in
/// their output manifest.
const TEMPLATES: &[(&str, &str)] = &[
    ("rust/Cargo.toml", include_str!("../templates/rust/Cargo.toml.hbs")),
    ("rust/README.md", include_str!("../templates/rust/README.md.hbs")),
    ("rust/lib.rs", include_str!("../templates/rust/lib.rs.hbs")),
    ("rust/model.rs", include_str!("../templates/rust/model.rs.hbs")),
    ("rust/client.rs", include_str!("../templates/rust/client.rs.hbs")),
    ("typescript/package.json", include_str!("../templates/typescript/package.json.hbs")),
    ("typescript/index.ts", include_str!("../templates/typescript/index.ts.hbs")),
    ("typescript/model.ts", include_str!("../templates/typescript/model.ts.hbs")),
    ("typescript/client.ts", include_str!("../templates/typescript/client.ts.hbs")),
];

/// Partials shared by the output templates.
const PARTIALS: &[(&str, &str)] = &[
    ("rust_message", include_str!("../templates/rust/message.rs.hbs")),
    ("rust_enum", include_str!("../templates/rust/enum.rs.hbs")),
    ("ts_message", include_str!("../templates/typescript/message.ts.hbs")),
    ("ts_enum", include_str!("../templates/typescript/enum.ts.hbs")),
];

/// Template engine for package generation.
///
/// This type is `Send` and `Sync`, so one engine can serve several
/// generation runs.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        for (name, source) in PARTIALS {
            engine.register_partial(name, source)?;
        }
        for (name, source) in TEMPLATES {
            engine.register_template_string(name, source)?;
        }
        tracing::debug!(
            templates = TEMPLATES.len(),
            partials = PARTIALS.len(),
            "registered built-in templates"
        );
        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the template is not registered,
    /// references a missing key, or fails to render.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                template: template_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Returns `true` if a template named `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Registers a template, replacing a built-in one with the same name.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: format!("failed to register template: {e}"),
            })
    }

    /// Registers a partial usable as `{{> name}}` from any template.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the partial string is invalid.
    pub fn register_partial(&mut self, name: &str, partial: &str) -> Result<()> {
        self.handlebars
            .register_partial(name, partial)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: format!("failed to register partial: {e}"),
            })
    }
}
