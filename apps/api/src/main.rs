mod blurbs;
mod config;
mod db;
mod engine;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod templates;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::blurbs::pg_store::PgBlurbStore;
use crate::blurbs::store::{BlurbStore, InMemoryBlurbStore};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::engine::BlurbEngine;
use crate::generation::context::{ContextSource, PgContextSource, StaticContextSource};
use crate::generation::coordinator::{GenerationCoordinator, GenerationSettings};
use crate::generation::generator::LlmBlurbGenerator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::registry::TemplateRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Blurb API v{}", env!("CARGO_PKG_VERSION"));

    // Storage and candidate context: Postgres when configured, otherwise in-memory
    let (store, context_source) = build_backends(&config).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_max_attempts)?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("ANTHROPIC_API_KEY is not set; every generation request will fail");
    }

    // Load templates
    let registry = TemplateRegistry::load_dir(&config.templates_dir)?;
    if registry.get_template(&config.default_template).is_err() {
        warn!(
            "Default template '{}' not found in {}",
            config.default_template,
            config.templates_dir.display()
        );
    }

    let coordinator = GenerationCoordinator::new(
        store.clone(),
        Arc::new(LlmBlurbGenerator::new(llm)),
        context_source,
        GenerationSettings {
            blurbs_per_field: config.blurbs_per_field,
            timeout: config.generation_timeout,
        },
    );
    let engine = BlurbEngine::new(
        registry,
        config.default_template.clone(),
        store,
        coordinator,
    )
    .with_templates_dir(config.templates_dir.clone());

    // Build app state
    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the blurb store and candidate context source for this run.
async fn build_backends(
    config: &Config,
) -> Result<(Arc<dyn BlurbStore>, Arc<dyn ContextSource>)> {
    if let Some(database_url) = &config.database_url {
        let pool = create_pool(database_url).await?;
        ensure_schema(&pool).await?;
        return Ok((
            Arc::new(PgBlurbStore::new(pool.clone())),
            Arc::new(PgContextSource::new(pool)),
        ));
    }

    warn!("DATABASE_URL is not set; blurbs are kept in memory and lost on restart");
    let context_source = match &config.candidate_context_path {
        Some(path) => {
            let source = StaticContextSource::from_json_file(path)?;
            info!("Candidate context loaded from {}", path.display());
            source
        }
        None => StaticContextSource::default(),
    };
    Ok((Arc::new(InMemoryBlurbStore::new()), Arc::new(context_source)))
}
