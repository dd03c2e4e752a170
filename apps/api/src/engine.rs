//! Blurb engine: the single entry point handlers talk to.
//!
//! Owns the template registry, the active template selection, the blurb store and
//! the generation coordinator. Field-level reads (`list_blurbs_for_field`,
//! `effective_field_text`, `compiled_fields`) are scoped to the active template.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::blurbs::review::Review;
use crate::blurbs::store::BlurbStore;
use crate::errors::AppError;
use crate::generation::coordinator::GenerationCoordinator;
use crate::models::blurb::Blurb;
use crate::templates::fields::{generable_fields, generable_sections};
use crate::templates::registry::TemplateRegistry;
use crate::templates::Template;

/// Resolved text of one generable field, ready to drop into a rendered CV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledField {
    pub field_key: String,
    pub label: String,
    pub text: String,
}

pub struct BlurbEngine {
    registry: RwLock<Arc<TemplateRegistry>>,
    templates_dir: Option<PathBuf>,
    active_template: RwLock<String>,
    store: Arc<dyn BlurbStore>,
    coordinator: GenerationCoordinator,
}

impl BlurbEngine {
    pub fn new(
        registry: TemplateRegistry,
        active_template: String,
        store: Arc<dyn BlurbStore>,
        coordinator: GenerationCoordinator,
    ) -> Self {
        Self {
            registry: RwLock::new(Arc::new(registry)),
            templates_dir: None,
            active_template: RwLock::new(active_template),
            store,
            coordinator,
        }
    }

    /// Enables `reload_templates` from `dir`.
    pub fn with_templates_dir(mut self, dir: PathBuf) -> Self {
        self.templates_dir = Some(dir);
        self
    }

    async fn registry(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&*self.registry.read().await)
    }

    // ── Templates ──────────────────────────────────────────────────────────

    pub async fn list_templates(&self) -> Vec<Template> {
        self.registry().await.list_templates().to_vec()
    }

    pub async fn get_template(&self, name: &str) -> Result<Template, AppError> {
        self.registry().await.get_template(name).cloned()
    }

    pub async fn list_generable_fields(&self, template_name: &str) -> Result<Vec<String>, AppError> {
        let registry = self.registry().await;
        Ok(generable_fields(registry.get_template(template_name)?))
    }

    pub async fn active_template(&self) -> String {
        self.active_template.read().await.clone()
    }

    /// Makes `name` the template that field-level reads resolve against.
    pub async fn select_template(&self, name: &str) -> Result<Template, AppError> {
        let template = self.get_template(name).await?;
        *self.active_template.write().await = template.name.clone();
        info!("Active template set to '{}'", template.name);
        Ok(template)
    }

    /// Re-reads the templates directory and swaps the registry in one step.
    /// A malformed config leaves the current registry in place.
    pub async fn reload_templates(&self) -> Result<usize, AppError> {
        let dir = self.templates_dir.clone().ok_or_else(|| {
            AppError::Validation("No templates directory is configured".to_string())
        })?;

        let loaded = tokio::task::spawn_blocking(move || TemplateRegistry::load_dir(&dir))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        let count = loaded.list_templates().len();

        let active = self.active_template().await;
        if loaded.get_template(&active).is_err() {
            warn!("Active template '{active}' is missing after reload");
        }

        *self.registry.write().await = Arc::new(loaded);
        info!("Template registry reloaded ({count} templates)");
        Ok(count)
    }

    // ── Generation ─────────────────────────────────────────────────────────

    /// Generates pending blurbs for `field_key`, defaulting to the active template.
    pub async fn request_generation(
        &self,
        field_key: &str,
        template_name: Option<&str>,
    ) -> Result<Vec<Blurb>, AppError> {
        let template_name = match template_name {
            Some(name) => name.to_string(),
            None => self.active_template().await,
        };
        let registry = self.registry().await;
        let template = registry.get_template(&template_name)?;
        self.coordinator.generate(template, field_key).await
    }

    /// Field keys with a generation in flight, sorted.
    pub fn generating_fields(&self) -> Vec<String> {
        self.coordinator.locks().in_flight()
    }

    // ── Blurbs ─────────────────────────────────────────────────────────────

    pub async fn list_blurbs_for_template(&self, template_name: &str) -> Result<Vec<Blurb>, AppError> {
        self.store.by_template(template_name).await
    }

    pub async fn list_blurbs_for_field(&self, field_key: &str) -> Result<Vec<Blurb>, AppError> {
        let template_name = self.active_template().await;
        self.store.by_field(&template_name, field_key).await
    }

    pub async fn review_blurb(&self, id: Uuid, review: Review) -> Result<Blurb, AppError> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| blurb_not_found(id))?;
        review.check_transition(current.status)?;

        let updated = self
            .store
            .apply_review(id, &review)
            .await?
            .ok_or_else(|| blurb_not_found(id))?;
        info!(
            "Blurb {} for field '{}': {} -> {}",
            id, updated.field_key, current.status, updated.status
        );
        Ok(updated)
    }

    /// Deletes a blurb. Any in-flight generation for its field loses the lock, so the
    /// field can be regenerated straight away.
    pub async fn delete_blurb(&self, id: Uuid) -> Result<Blurb, AppError> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| blurb_not_found(id))?;

        if self.coordinator.locks().invalidate(&removed.field_key) {
            warn!(
                "Invalidated in-flight generation for field '{}' after deleting blurb {}",
                removed.field_key, id
            );
        }
        info!("Deleted blurb {} for field '{}'", id, removed.field_key);
        Ok(removed)
    }

    // ── Compilation ────────────────────────────────────────────────────────

    /// Resolved text for one field of the active template; "" if nothing qualifies.
    pub async fn effective_field_text(&self, field_key: &str) -> Result<String, AppError> {
        let template_name = self.active_template().await;
        self.store.effective_text(&template_name, field_key).await
    }

    /// Resolved text for every generable field of the active template, in template order.
    pub async fn compiled_fields(&self) -> Result<Vec<CompiledField>, AppError> {
        let registry = self.registry().await;
        let template = registry.get_template(&self.active_template().await)?;

        let mut compiled = Vec::new();
        for section in generable_sections(template) {
            compiled.push(CompiledField {
                field_key: section.key.clone(),
                label: section.label.clone(),
                text: self.store.effective_text(&template.name, &section.key).await?,
            });
        }
        Ok(compiled)
    }
}

fn blurb_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Blurb {id} not found"))
}
