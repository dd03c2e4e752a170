//! Template Schema Registry: named templates loaded from disk.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::templates::Template;

const CONFIG_FILE: &str = "config.json";

/// Immutable set of templates, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    /// Builds a registry from already-parsed templates. Names must be unique;
    /// on collision the first template is kept.
    pub fn new(mut templates: Vec<Template>) -> Self {
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates.dedup_by(|later, earlier| later.name == earlier.name);
        Self { templates }
    }

    /// Loads every `<dir>/<name>/config.json`. Subdirectories without a config are
    /// skipped; a config that fails to parse aborts the load.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            warn!("Templates directory {} does not exist", dir.display());
            return Ok(Self::default());
        }

        let mut templates = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read templates directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            let config_path = path.join(CONFIG_FILE);
            if !config_path.is_file() {
                debug!("Skipping {} (no {CONFIG_FILE})", path.display());
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!("Skipping template with non UTF-8 name: {}", path.display());
                continue;
            };

            let raw = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let mut template: Template = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid template config {}", config_path.display()))?;
            template.name = name.to_string();
            templates.push(template);
        }

        let registry = Self::new(templates);
        info!(
            "Loaded {} templates from {}",
            registry.templates.len(),
            dir.display()
        );
        Ok(registry)
    }

    pub fn list_templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get_template(&self, name: &str) -> Result<&Template, AppError> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Template '{name}' not found")))
    }
}
