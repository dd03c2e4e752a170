//! Blurb Store: holds every candidate blurb and answers effective-text queries.
//!
//! `AppState` carries the store as `Arc<dyn BlurbStore>` so the backend (in-memory or
//! Postgres) is chosen once at startup. Every query returns blurbs in creation order,
//! which the selection rule in `review` depends on.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::blurbs::review::{resolve_text, Review};
use crate::errors::AppError;
use crate::models::blurb::Blurb;

#[async_trait]
pub trait BlurbStore: Send + Sync {
    /// Appends all of `blurbs`, or none of them on error.
    async fn append(&self, blurbs: &[Blurb]) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Blurb>, AppError>;

    async fn by_field(&self, template_name: &str, field_key: &str)
        -> Result<Vec<Blurb>, AppError>;

    async fn by_template(&self, template_name: &str) -> Result<Vec<Blurb>, AppError>;

    /// Applies a validated review. `Ok(None)` if no blurb has this id.
    async fn apply_review(&self, id: Uuid, review: &Review) -> Result<Option<Blurb>, AppError>;

    /// Removes a blurb and returns it. `Ok(None)` if no blurb has this id.
    async fn delete(&self, id: Uuid) -> Result<Option<Blurb>, AppError>;

    /// Resolved text for a field: the newest non-rejected blurb's effective text, or "".
    async fn effective_text(&self, template_name: &str, field_key: &str) -> Result<String, AppError> {
        let blurbs = self.by_field(template_name, field_key).await?;
        Ok(resolve_text(&blurbs))
    }
}

/// Process-local store. The vector's order is creation order.
#[derive(Debug, Default)]
pub struct InMemoryBlurbStore {
    blurbs: RwLock<Vec<Blurb>>,
}

impl InMemoryBlurbStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlurbStore for InMemoryBlurbStore {
    async fn append(&self, blurbs: &[Blurb]) -> Result<(), AppError> {
        self.blurbs.write().await.extend_from_slice(blurbs);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Blurb>, AppError> {
        Ok(self.blurbs.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn by_field(
        &self,
        template_name: &str,
        field_key: &str,
    ) -> Result<Vec<Blurb>, AppError> {
        Ok(self
            .blurbs
            .read()
            .await
            .iter()
            .filter(|b| b.template_name == template_name && b.field_key == field_key)
            .cloned()
            .collect())
    }

    async fn by_template(&self, template_name: &str) -> Result<Vec<Blurb>, AppError> {
        Ok(self
            .blurbs
            .read()
            .await
            .iter()
            .filter(|b| b.template_name == template_name)
            .cloned()
            .collect())
    }

    async fn apply_review(&self, id: Uuid, review: &Review) -> Result<Option<Blurb>, AppError> {
        let mut blurbs = self.blurbs.write().await;
        Ok(blurbs.iter_mut().find(|b| b.id == id).map(|blurb| {
            review.apply_to(blurb);
            blurb.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Blurb>, AppError> {
        let mut blurbs = self.blurbs.write().await;
        Ok(blurbs
            .iter()
            .position(|b| b.id == id)
            .map(|index| blurbs.remove(index)))
    }
}
