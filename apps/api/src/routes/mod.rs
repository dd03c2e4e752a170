pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::blurbs::handlers as blurbs;
use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route(
            "/api/v1/templates/active",
            get(templates::handle_get_active_template).put(templates::handle_select_template),
        )
        .route(
            "/api/v1/templates/reload",
            post(templates::handle_reload_templates),
        )
        .route("/api/v1/templates/:name", get(templates::handle_get_template))
        .route(
            "/api/v1/templates/:name/fields",
            get(templates::handle_generable_fields),
        )
        // Generation
        .route("/api/v1/blurbs/generate", post(generation::handle_generate))
        .route(
            "/api/v1/blurbs/generating",
            get(generation::handle_generating),
        )
        // Blurbs
        .route("/api/v1/blurbs", get(blurbs::handle_list_blurbs))
        .route(
            "/api/v1/blurbs/fields/:field_key",
            get(blurbs::handle_field_blurbs),
        )
        .route(
            "/api/v1/blurbs/fields/:field_key/effective",
            get(blurbs::handle_effective_text),
        )
        .route(
            "/api/v1/blurbs/:id",
            patch(blurbs::handle_review_blurb).delete(blurbs::handle_delete_blurb),
        )
        // Compilation
        .route("/api/v1/compile/fields", get(blurbs::handle_compiled_fields))
        .with_state(state)
}
