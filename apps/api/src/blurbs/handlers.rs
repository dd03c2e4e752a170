use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blurbs::review::{Review, ReviewRequest};
use crate::engine::CompiledField;
use crate::errors::AppError;
use crate::models::blurb::Blurb;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub template_name: Option<String>,
}

#[derive(Serialize)]
pub struct BlurbListResponse {
    pub template_name: String,
    pub blurbs: Vec<Blurb>,
}

#[derive(Serialize)]
pub struct EffectiveTextResponse {
    pub template_name: String,
    pub field_key: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct CompiledFieldsResponse {
    pub template_name: String,
    pub fields: Vec<CompiledField>,
}

/// GET /api/v1/blurbs?template_name=
pub async fn handle_list_blurbs(
    State(state): State<AppState>,
    Query(params): Query<TemplateQuery>,
) -> Result<Json<BlurbListResponse>, AppError> {
    let template_name = match params.template_name {
        Some(name) => name,
        None => state.engine.active_template().await,
    };
    let blurbs = state.engine.list_blurbs_for_template(&template_name).await?;
    Ok(Json(BlurbListResponse {
        template_name,
        blurbs,
    }))
}

/// GET /api/v1/blurbs/fields/:field_key
pub async fn handle_field_blurbs(
    State(state): State<AppState>,
    Path(field_key): Path<String>,
) -> Result<Json<BlurbListResponse>, AppError> {
    let template_name = state.engine.active_template().await;
    let blurbs = state.engine.list_blurbs_for_field(&field_key).await?;
    Ok(Json(BlurbListResponse {
        template_name,
        blurbs,
    }))
}

/// GET /api/v1/blurbs/fields/:field_key/effective
pub async fn handle_effective_text(
    State(state): State<AppState>,
    Path(field_key): Path<String>,
) -> Result<Json<EffectiveTextResponse>, AppError> {
    let template_name = state.engine.active_template().await;
    let text = state.engine.effective_field_text(&field_key).await?;
    Ok(Json(EffectiveTextResponse {
        template_name,
        field_key,
        text,
    }))
}

/// PATCH /api/v1/blurbs/:id
pub async fn handle_review_blurb(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Blurb>, AppError> {
    let review = Review::try_from(req)?;
    Ok(Json(state.engine.review_blurb(id, review).await?))
}

/// DELETE /api/v1/blurbs/:id
pub async fn handle_delete_blurb(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.engine.delete_blurb(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/compile/fields
pub async fn handle_compiled_fields(
    State(state): State<AppState>,
) -> Result<Json<CompiledFieldsResponse>, AppError> {
    let template_name = state.engine.active_template().await;
    let fields = state.engine.compiled_fields().await?;
    Ok(Json(CompiledFieldsResponse {
        template_name,
        fields,
    }))
}
