//! Axum route handlers for the Generation API.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{CopyResult, GenerationOptions, ProductRecord};
use crate::state::AppState;

/// POST /generate
///
/// The body is the product record itself. `?model=` overrides the configured model.
/// Provider failures become a 500 with `{"error": message}`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(options): Query<GenerationOptions>,
    Json(product): Json<ProductRecord>,
) -> Result<Json<CopyResult>, AppError> {
    let result = state.generator.generate(&product, &options).await?;

    if result.is_fallback() {
        info!("Provider reply was not a JSON object; returned fallback copy");
    }

    Ok(Json(result))
}
