//! Generation Coordinator: one field, one in-flight request, all-or-nothing results.
//!
//! Flow: validate field → claim field lock → load candidate context →
//!       call generator (bounded by timeout) → append pending blurbs → release lock.
//!
//! The lock is held by a `GenerationGuard` local, so every early return, error,
//! timeout or dropped future releases it. Nothing is written unless the generator
//! produced at least one usable candidate.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::blurbs::store::BlurbStore;
use crate::errors::AppError;
use crate::generation::context::ContextSource;
use crate::generation::generator::{BlurbGenerator, GenerationError, GenerationRequest};
use crate::generation::locks::GenerationLocks;
use crate::models::blurb::Blurb;
use crate::templates::fields::generable_section;
use crate::templates::{SectionDescriptor, Template};

/// Tunables for a single generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub blurbs_per_field: u32,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            blurbs_per_field: 3,
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct GenerationCoordinator {
    store: Arc<dyn BlurbStore>,
    locks: Arc<GenerationLocks>,
    generator: Arc<dyn BlurbGenerator>,
    context_source: Arc<dyn ContextSource>,
    settings: GenerationSettings,
}

impl GenerationCoordinator {
    pub fn new(
        store: Arc<dyn BlurbStore>,
        generator: Arc<dyn BlurbGenerator>,
        context_source: Arc<dyn ContextSource>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            store,
            locks: GenerationLocks::new(),
            generator,
            context_source,
            settings,
        }
    }

    pub fn locks(&self) -> &Arc<GenerationLocks> {
        &self.locks
    }

    /// Generates candidates for `field_key` and stores them as pending blurbs.
    ///
    /// Errors:
    /// - `InvalidField` if the field is not a blurb section of `template`
    /// - `AlreadyInProgress` if any generation for this field key is running
    /// - `GenerationFailed` on upstream error, timeout or an empty/malformed response
    pub async fn generate(&self, template: &Template, field_key: &str) -> Result<Vec<Blurb>, AppError> {
        let section =
            generable_section(template, field_key).ok_or_else(|| AppError::InvalidField {
                field_key: field_key.to_string(),
                template_name: template.name.clone(),
            })?;

        let _guard = self.locks.try_acquire(field_key).ok_or_else(|| {
            warn!("Rejected generation for field '{field_key}': already in progress");
            AppError::AlreadyInProgress(field_key.to_string())
        })?;

        info!(
            "Generating {} blurbs for field '{}' (template '{}')",
            self.settings.blurbs_per_field, field_key, template.name
        );

        let candidates = match self.request_candidates(template, section).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Generation for field '{field_key}' failed: {e}");
                return Err(e);
            }
        };

        let blurbs: Vec<Blurb> = candidates
            .into_iter()
            .map(|text| Blurb::pending(&template.name, field_key, text))
            .collect();
        self.store.append(&blurbs).await?;

        info!(
            "Stored {} pending blurbs for field '{}' (template '{}')",
            blurbs.len(),
            field_key,
            template.name
        );
        Ok(blurbs)
    }

    async fn request_candidates(
        &self,
        template: &Template,
        section: &SectionDescriptor,
    ) -> Result<Vec<String>, AppError> {
        let context = self.context_source.load().await?;

        let request = GenerationRequest {
            template_name: template.name.clone(),
            field: section.clone(),
            count: self.settings.blurbs_per_field,
            context,
        };

        let candidates =
            match tokio::time::timeout(self.settings.timeout, self.generator.generate(&request))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(GenerationError::Transient(format!(
                        "Generation timed out after {}s",
                        self.settings.timeout.as_secs()
                    ))
                    .into())
                }
            };

        let candidates: Vec<String> = candidates
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        if candidates.is_empty() {
            return Err(GenerationError::Transient(
                "Generation service returned no usable suggestions".to_string(),
            )
            .into());
        }

        Ok(candidates)
    }
}
