//! Axum route handlers for the Generation API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::blurb::Blurb;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub field_key: String,
    /// Defaults to the active template.
    #[serde(default)]
    pub template_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub field_key: String,
    pub blurbs: Vec<Blurb>,
}

#[derive(Debug, Serialize)]
pub struct GeneratingResponse {
    pub field_keys: Vec<String>,
}

/// POST /api/v1/blurbs/generate
///
/// Generates pending blurbs for one field. Unknown, blank or non-blurb keys are 400
/// `INVALID_FIELD`. Rejects with 409 while another generation for the same field is running.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let blurbs = state
        .engine
        .request_generation(&request.field_key, request.template_name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            field_key: request.field_key,
            blurbs,
        }),
    ))
}

/// GET /api/v1/blurbs/generating
pub async fn handle_generating(State(state): State<AppState>) -> Json<GeneratingResponse> {
    Json(GeneratingResponse {
        field_keys: state.engine.generating_fields(),
    })
}
