//! Package generator.
//!
//! Ties a codec, the template engine, and the context builder together:
//! checks the model, builds one [`ApiContext`](crate::ApiContext) per run,
//! renders every output template of the target, and writes the results.
//!
//! Only configuration errors, mixed source packages, and structurally
//! invalid models stop a run before output is produced. A template that
//! fails to render or a file that fails to write is recorded; the remaining
//! files are still produced, and every failure is reported once at the end.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::{Generator, Target};
//! use apigen_core::model::{Field, Message, Typez};
//! use apigen_core::{Api, CodecOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
//! api.add_message(
//!     Message::new("Secret", ".google.cloud.secretmanager.v1.Secret")
//!         .with_field(Field::new("name", Typez::String)),
//! );
//!
//! let generator = Generator::for_target(Target::Rust, CodecOptions::default())?;
//! Generator::prepare(&mut api)?;
//! let output = generator.render(&api);
//!
//! assert!(output.failures.is_empty());
//! let model = output.code.file("src/model.rs").unwrap();
//! assert!(model.content.contains("pub struct Secret"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::codec::{Codec, Target, codec_for};
use crate::context::ContextBuilder;
use crate::output::{GeneratedCode, GeneratedFile};
use crate::state::Diagnostic;
use crate::template_engine::TemplateEngine;
use apigen_core::{Api, CodecOptions, Error, FileFailure, GeneratorConfig, Result};
use std::path::{Path, PathBuf};

/// Result of rendering every output template of a run.
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    /// Files that rendered successfully
    pub code: GeneratedCode,
    /// Templates that failed to render
    pub failures: Vec<FileFailure>,
    /// Resolution problems found while building the context
    pub diagnostics: Vec<Diagnostic>,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Paths of the written files, in template order
    pub files_written: Vec<PathBuf>,
    /// Resolution problems found while building the context
    pub diagnostics: Vec<Diagnostic>,
}

/// Generates one client package per run.
#[derive(Debug)]
pub struct Generator<'a> {
    codec: Box<dyn Codec>,
    engine: TemplateEngine<'a>,
    additional: serde_json::Value,
}

impl<'a> Generator<'a> {
    /// Creates a generator for `codec` with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if a built-in template fails to parse.
    pub fn new(codec: Box<dyn Codec>) -> Result<Self> {
        let engine = TemplateEngine::new()?;
        Ok(Self {
            codec,
            engine,
            additional: serde_json::Value::Null,
        })
    }

    /// Creates a generator for `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if a built-in template fails to parse.
    pub fn for_target(target: Target, options: CodecOptions) -> Result<Self> {
        Self::new(codec_for(target, options))
    }

    /// Creates a generator from a parsed configuration document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the language is missing or
    /// unsupported, or if a codec option is malformed.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let language = config
            .general
            .language
            .as_deref()
            .ok_or_else(|| Error::ConfigError {
                message: "missing [general] language".to_string(),
            })?;
        let target: Target = language.parse()?;
        let options = config.codec_options()?;
        Self::for_target(target, options)
    }

    /// Attaches caller-provided values, exposed to templates as
    /// `additional`.
    #[must_use]
    pub fn with_additional(mut self, additional: serde_json::Value) -> Self {
        self.additional = additional;
        self
    }

    /// The codec of this generator.
    #[must_use]
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// The template engine, for registering custom templates or partials.
    pub const fn engine_mut(&mut self) -> &mut TemplateEngine<'a> {
        &mut self.engine
    }

    /// Checks the model and completes it for resolution.
    ///
    /// Loads the well-known types, then rejects models spanning more than
    /// one source package and malformed map messages. References that do
    /// not resolve are left to the resolvers, which report diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `Error::MixedPackages` or `Error::ModelError`.
    pub fn prepare(api: &mut Api) -> Result<()> {
        api.load_well_known_types();
        let package = api.single_package()?;
        api.validate()?;
        tracing::debug!(package = %package, "model is consistent");
        Ok(())
    }

    /// Renders every output template of the target.
    ///
    /// Never fails as a whole: templates that fail to render are listed in
    /// [`RenderOutput::failures`].
    #[must_use]
    pub fn render(&self, api: &Api) -> RenderOutput {
        let codec = self.codec.as_ref();
        tracing::info!("Rendering {} package for API: {}", codec.target(), api.name);

        let context = ContextBuilder::new(codec, api)
            .with_additional(self.additional.clone())
            .build();

        let mut output = RenderOutput::default();
        for template in codec.templates() {
            match self.engine.render(template.template, &context) {
                Ok(content) => {
                    output.code.add_file(GeneratedFile {
                        path: template.path.to_string(),
                        content,
                    });
                    tracing::debug!("Rendered {}", template.path);
                }
                Err(e) => {
                    tracing::warn!(template = template.template, error = %e, "template failed");
                    output.failures.push(FileFailure {
                        template: template.template.to_string(),
                        path: template.path.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        output.diagnostics = context.diagnostics;
        output
    }

    /// Prepares the model, renders every output template, and writes the
    /// results below `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns the fatal errors of [`Generator::prepare`] before any output
    /// is written, and `Error::GenerationFailed` listing every file that
    /// failed to render or write once all other files have been written.
    pub fn generate(&self, api: &mut Api, out_dir: &Path) -> Result<GenerationReport> {
        Self::prepare(api)?;
        let RenderOutput {
            code,
            mut failures,
            diagnostics,
        } = self.render(api);

        let mut files_written = Vec::with_capacity(code.file_count());
        for file in code.files() {
            match file.write_under(out_dir) {
                Ok(path) => files_written.push(path),
                Err(e) => failures.push(FileFailure {
                    template: self.template_for(&file.path),
                    path: file.path.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if !failures.is_empty() {
            tracing::error!("{} file(s) failed for {}", failures.len(), api.name);
            return Err(Error::GenerationFailed { failures });
        }

        tracing::info!(
            "Successfully generated {} files for {} ({} diagnostics)",
            files_written.len(),
            api.name,
            diagnostics.len()
        );
        Ok(GenerationReport {
            files_written,
            diagnostics,
        })
    }

    fn template_for(&self, path: &str) -> String {
        self.codec
            .templates()
            .iter()
            .find(|t| t.path == path)
            .map(|t| t.template.to_string())
            .unwrap_or_default()
    }
}
