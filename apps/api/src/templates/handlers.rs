use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::Template;

#[derive(Serialize)]
pub struct TemplateListResponse {
    pub active_template: String,
    pub templates: Vec<Template>,
}

#[derive(Serialize)]
pub struct GenerableFieldsResponse {
    pub template_name: String,
    pub field_keys: Vec<String>,
}

#[derive(Serialize)]
pub struct ActiveTemplateResponse {
    pub template: Template,
}

#[derive(Deserialize)]
pub struct SelectTemplateRequest {
    pub template_name: String,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub loaded: usize,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        active_template: state.engine.active_template().await,
        templates: state.engine.list_templates().await,
    })
}

/// GET /api/v1/templates/:name
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Template>, AppError> {
    Ok(Json(state.engine.get_template(&name).await?))
}

/// GET /api/v1/templates/:name/fields
pub async fn handle_generable_fields(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GenerableFieldsResponse>, AppError> {
    let field_keys = state.engine.list_generable_fields(&name).await?;
    Ok(Json(GenerableFieldsResponse {
        template_name: name,
        field_keys,
    }))
}

/// GET /api/v1/templates/active
pub async fn handle_get_active_template(
    State(state): State<AppState>,
) -> Result<Json<ActiveTemplateResponse>, AppError> {
    let name = state.engine.active_template().await;
    let template = state.engine.get_template(&name).await?;
    Ok(Json(ActiveTemplateResponse { template }))
}

/// PUT /api/v1/templates/active
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<ActiveTemplateResponse>, AppError> {
    let template = state.engine.select_template(&req.template_name).await?;
    Ok(Json(ActiveTemplateResponse { template }))
}

/// POST /api/v1/templates/reload
pub async fn handle_reload_templates(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let loaded = state.engine.reload_templates().await?;
    Ok(Json(ReloadResponse { loaded }))
}
