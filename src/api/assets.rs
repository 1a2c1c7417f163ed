//! Static seed resource.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// GET /assets/employees.json - Serve the configured seed file as-is.
pub async fn seed_resource(State(state): State<AppState>) -> Result<Response, AppError> {
    let path = &state.config.seed_file;
    let body = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!("Seed file {:?} unavailable: {}", path, e);
        AppError::NotFound("Seed resource not found".to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
