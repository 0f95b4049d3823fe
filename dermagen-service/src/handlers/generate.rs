use crate::models::{GenerateRequest, GenerateResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

/// `POST /api/generate`
#[tracing::instrument(skip(state, payload))]
pub async fn generate_images(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let images = state.generator.generate(&request).await?;

    Ok(Json(GenerateResponse {
        success: true,
        images,
    }))
}
