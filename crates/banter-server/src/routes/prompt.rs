//! Prompt Routes - Reusable prompt templates

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, CreatePromptRequest, PromptResponse, UpdatePromptRequest};
use crate::AppState;

/// List the caller's prompts
#[utoipa::path(
    get,
    path = "/api/chat/prompts",
    responses(
        (status = 200, description = "Prompts ordered by name", body = Vec<PromptResponse>)
    ),
    tag = "Prompt"
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<Vec<PromptResponse>>>> {
    let prompts = state.prompt_service.list(user.id).await?;
    Ok(ApiResponse::ok(prompts.into_iter().map(Into::into).collect()))
}

/// Create a prompt
#[utoipa::path(
    post,
    path = "/api/chat/prompt",
    request_body = CreatePromptRequest,
    responses(
        (status = 201, description = "Prompt created", body = PromptResponse),
        (status = 400, description = "Invalid prompt")
    ),
    tag = "Prompt"
)]
pub async fn create_prompt(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePromptRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PromptResponse>>)> {
    let prompt = state
        .prompt_service
        .create(user.id, payload.prompt.into())
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(prompt.into())))
}

/// Replace every field of a prompt
#[utoipa::path(
    patch,
    path = "/api/chat/prompt",
    request_body = UpdatePromptRequest,
    responses(
        (status = 200, description = "Prompt updated", body = PromptResponse),
        (status = 400, description = "Invalid prompt"),
        (status = 404, description = "Prompt not found")
    ),
    tag = "Prompt"
)]
pub async fn update_prompt(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePromptRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<PromptResponse>>> {
    let prompt = state
        .prompt_service
        .update(user.id, payload.prompt.id, payload.prompt.fields.into())
        .await?;
    Ok(ApiResponse::ok(prompt.into()))
}

/// Delete a prompt
#[utoipa::path(
    delete,
    path = "/api/chat/prompt/{id}",
    params(
        ("id" = Uuid, Path, description = "Prompt ID")
    ),
    responses(
        (status = 200, description = "Deleted prompt id", body = String),
        (status = 404, description = "Prompt not found")
    ),
    tag = "Prompt"
)]
pub async fn delete_prompt(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    let id = state.prompt_service.delete(user.id, id).await?;
    Ok(ApiResponse::ok(id))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/prompts", get(list_prompts))
        .route("/api/chat/prompt", post(create_prompt).patch(update_prompt))
        .route("/api/chat/prompt/:id", delete(delete_prompt))
}
