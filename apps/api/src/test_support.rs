// Shared fixtures for unit and router tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Barrier, Notify};

use crate::blurbs::store::{BlurbStore, InMemoryBlurbStore};
use crate::engine::BlurbEngine;
use crate::generation::context::{CandidateContext, ContextSource, StaticContextSource};
use crate::generation::coordinator::{GenerationCoordinator, GenerationSettings};
use crate::generation::generator::{BlurbGenerator, GenerationError, GenerationRequest};
use crate::templates::registry::TemplateRegistry;
use crate::templates::{SectionDescriptor, SectionType, Template};

pub fn section(key: &str, section_type: SectionType) -> SectionDescriptor {
    SectionDescriptor {
        key: key.to_string(),
        section_type,
        label: key.to_string(),
        prompt_context: None,
        max_chars: None,
    }
}

/// `title` (text), `summary` (blurb), `bio` (blurb), `skills` (list).
pub fn classic_template() -> Template {
    Template {
        name: "classic".to_string(),
        description: Some("Single-column layout".to_string()),
        sections: vec![
            section("title", SectionType::Text),
            SectionDescriptor {
                label: "Professional Summary".to_string(),
                prompt_context: Some("Two sentences about overall experience".to_string()),
                max_chars: Some(300),
                ..section("summary", SectionType::Blurb)
            },
            section("bio", SectionType::Blurb),
            section("skills", SectionType::List),
        ],
    }
}

/// `summary` (blurb), `headline` (blurb).
pub fn modern_template() -> Template {
    Template {
        name: "modern".to_string(),
        description: None,
        sections: vec![
            section("summary", SectionType::Blurb),
            section("headline", SectionType::Blurb),
        ],
    }
}

pub fn test_registry() -> TemplateRegistry {
    TemplateRegistry::new(vec![classic_template(), modern_template()])
}

/// Engine over an in-memory store with `classic` active.
pub fn test_engine(generator: Arc<dyn BlurbGenerator>) -> Arc<BlurbEngine> {
    test_engine_with_store(generator, Arc::new(InMemoryBlurbStore::new()))
}

pub fn test_engine_with_store(
    generator: Arc<dyn BlurbGenerator>,
    store: Arc<dyn BlurbStore>,
) -> Arc<BlurbEngine> {
    let coordinator = GenerationCoordinator::new(
        store.clone(),
        generator,
        Arc::new(StaticContextSource::default()),
        GenerationSettings {
            blurbs_per_field: 3,
            timeout: Duration::from_secs(5),
        },
    );
    Arc::new(BlurbEngine::new(
        test_registry(),
        "classic".to_string(),
        store,
        coordinator,
    ))
}

/// Replays canned results in order, then fails transiently once exhausted.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<Vec<String>, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<Vec<String>, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(vec![Ok(texts.iter().map(|t| t.to_string()).collect())])
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlurbGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transient("script exhausted".into())))
    }
}

/// Blocks every call until the test releases it.
#[derive(Default)]
pub struct GatedGenerator {
    started: Notify,
    release: Notify,
    candidates: Vec<String>,
}

impl GatedGenerator {
    pub fn new(candidates: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        })
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl BlurbGenerator for GatedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.candidates.clone())
    }
}

/// Completes only once `n` calls are in flight together.
pub struct RendezvousGenerator {
    barrier: Barrier,
}

impl RendezvousGenerator {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Barrier::new(n),
        }
    }
}

#[async_trait]
impl BlurbGenerator for RendezvousGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        self.barrier.wait().await;
        Ok(vec![format!("{} text", request.field.key)])
    }
}

/// Never answers.
pub struct PendingForever;

#[async_trait]
impl BlurbGenerator for PendingForever {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        std::future::pending().await
    }
}

/// Panics on every call.
pub struct PanickingGenerator;

#[async_trait]
impl BlurbGenerator for PanickingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        panic!("generator crashed");
    }
}

/// A candidate record that can never be loaded.
pub struct UnavailableContext;

#[async_trait]
impl ContextSource for UnavailableContext {
    async fn load(&self) -> anyhow::Result<CandidateContext> {
        anyhow::bail!("candidate tables unavailable")
    }
}
