//! OpenRouter Routes - Model catalog and account credits

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, CreditsResponse, ModelResponse, ModelSearchQuery};
use crate::AppState;

/// Remaining OpenRouter credits
#[utoipa::path(
    get,
    path = "/api/openrouter/credits",
    responses(
        (status = 200, description = "Account credits", body = CreditsResponse),
        (status = 502, description = "Failed to fetch credits")
    ),
    tag = "OpenRouter"
)]
pub async fn get_credits(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<CreditsResponse>>> {
    let credits = state
        .catalog_service
        .credits()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch credits", e))?;
    Ok(ApiResponse::ok(credits.into()))
}

/// Search the model catalog
#[utoipa::path(
    get,
    path = "/api/openrouter/models",
    params(ModelSearchQuery),
    responses(
        (status = 200, description = "Matching models", body = Vec<ModelResponse>),
        (status = 400, description = "Invalid filter value"),
        (status = 502, description = "Failed to fetch models")
    ),
    tag = "OpenRouter"
)]
pub async fn search_models(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ModelSearchQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<ModelResponse>>>> {
    let search = query.into_search()?;
    let models = state
        .catalog_service
        .search_models(&search)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch models", e))?;
    Ok(ApiResponse::ok(models.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/openrouter/models", get(search_models))
}

pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/api/openrouter/credits", get(get_credits))
        .route("/api/credits", get(get_credits))
}
