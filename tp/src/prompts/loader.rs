//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::TripRequest;
use crate::gateway::ItineraryParams;

/// Context for rendering the itinerary prompt
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// Interests joined with ", "
    pub interests: String,
    pub budget: String,
    pub pace: String,
    /// Inclusive trip length; omitted when the dates could not be parsed
    pub days: Option<u32>,
}

impl From<&ItineraryParams> for PromptContext {
    fn from(params: &ItineraryParams) -> Self {
        debug!(destination = %params.destination, days = ?params.trip_length_days(), "PromptContext::from: called");
        Self {
            destination: params.destination.clone(),
            start_date: params.start_date.clone(),
            end_date: params.end_date.clone(),
            interests: params.interests.join(", "),
            budget: params.budget.clone(),
            pace: params.pace.clone(),
            days: params.trip_length_days(),
        }
    }
}

impl From<&TripRequest> for PromptContext {
    fn from(request: &TripRequest) -> Self {
        Self::from(&ItineraryParams::from(request))
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory searched before the embedded templates
    dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` for `{name}.pmt` overrides
    pub fn new(dir: Option<&Path>) -> Self {
        debug!(?dir, "PromptLoader::new: called");
        let dir = dir.filter(|d| {
            let exists = d.is_dir();
            if !exists {
                debug!(?d, "PromptLoader::new: override directory missing, ignoring");
            }
            exists
        });

        Self {
            hbs: Self::engine(),
            dir: dir.map(Path::to_path_buf),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle "&" and quotes
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks the override directory first, then the embedded fallback.
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: no override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, destination = %context.destination, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}' for {}", template_name, context.destination);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the user prompt for an itinerary request
    pub fn itinerary_prompt(&self, context: &PromptContext) -> Result<String> {
        self.render("itinerary", context)
    }

    /// The system prompt, trimmed
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::system_prompt: called");
        Ok(self.load_template("system")?.trim().to_string())
    }
}
