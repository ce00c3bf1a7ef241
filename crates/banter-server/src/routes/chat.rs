//! Chat Routes - Conversations and messages
//!
//! Every handler is scoped to the authenticated user.

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
use crate::models::{
    ApiResponse, ConversationResponse, CreateConversationRequest, DeletedMessageResponse,
    RenameConversationRequest, SendMessageRequest, SendMessageResponse,
};
use crate::AppState;

/// List the caller's conversations
#[utoipa::path(
    get,
    path = "/api/chat/conversations",
    responses(
        (status = 200, description = "Conversations, most recent first", body = Vec<ConversationResponse>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Chat"
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<Vec<ConversationResponse>>>> {
    let conversations = state.chat_service.list(user.id).await?;
    Ok(ApiResponse::ok(
        conversations.into_iter().map(Into::into).collect(),
    ))
}

/// Get one conversation with its messages
#[utoipa::path(
    get,
    path = "/api/chat/conversation/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation found", body = ConversationResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "Chat"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<ConversationResponse>>> {
    let conversation = state.chat_service.get(user.id, id).await?;
    Ok(ApiResponse::ok(conversation.into()))
}

/// Start a conversation; the title is generated from the first message
#[utoipa::path(
    post,
    path = "/api/chat/conversation",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 400, description = "Missing content or model")
    ),
    tag = "Chat"
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateConversationRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ConversationResponse>>)> {
    let conversation = state
        .chat_service
        .create(user.id, &payload.content, &payload.model)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(conversation.into())))
}

/// Rename a conversation
#[utoipa::path(
    patch,
    path = "/api/chat/conversation/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    request_body = RenameConversationRequest,
    responses(
        (status = 200, description = "Conversation renamed", body = ConversationResponse),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "Chat"
)]
pub async fn rename_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<RenameConversationRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<ConversationResponse>>> {
    let conversation = state
        .chat_service
        .rename(user.id, id, &payload.title)
        .await?;
    Ok(ApiResponse::ok(conversation.into()))
}

/// Delete a conversation and its messages
#[utoipa::path(
    delete,
    path = "/api/chat/conversation/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Deleted conversation id", body = String),
        (status = 404, description = "Conversation not found")
    ),
    tag = "Chat"
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<Uuid>>> {
    let id = state.chat_service.delete(user.id, id).await?;
    Ok(ApiResponse::ok(id))
}

/// Send the context to the model and store the reply
#[utoipa::path(
    post,
    path = "/api/chat/message",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = SendMessageResponse),
        (status = 400, description = "Invalid context"),
        (status = 404, description = "Conversation not found"),
        (status = 502, description = "Completion API failed")
    ),
    tag = "Chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<SendMessageRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<SendMessageResponse>>> {
    let turn = payload.into_turn()?;
    let message = state
        .chat_service
        .send_message(user.id, turn)
        .await
        .map_err(|e| ApiError::upstream("Failed to get a response from the model", e))?;

    Ok(ApiResponse::ok(SendMessageResponse {
        message: message.into(),
    }))
}

/// Delete a single message
#[utoipa::path(
    delete,
    path = "/api/chat/message/{id}",
    params(
        ("id" = Uuid, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message deleted", body = DeletedMessageResponse),
        (status = 404, description = "Message not found")
    ),
    tag = "Chat"
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<DeletedMessageResponse>>> {
    let message = state.chat_service.delete_message(user.id, id).await?;
    Ok(ApiResponse::ok(DeletedMessageResponse {
        id: message.id,
        conversation_id: message.conversation_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/conversations", get(list_conversations))
        .route("/api/chat/conversation", post(create_conversation))
        .route(
            "/api/chat/conversation/:id",
            get(get_conversation)
                .patch(rename_conversation)
                .delete(delete_conversation),
        )
        .route("/api/chat/message", post(send_message))
        .route("/api/chat/message/:id", delete(delete_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeCompletion;
    use crate::routes::testing::{body_json, json_request, request, TestApp};

    fn app() -> TestApp {
        TestApp::new(FakeCompletion::replying("Greeting", "Hi! ```py\nprint(1)\n```"))
    }

    async fn start_conversation(app: &TestApp, token: &str) -> serde_json::Value {
        let response = app
            .send(json_request(
                "POST",
                "/api/chat/conversation",
                Some(token),
                r#"{"content": "Hello there", "model": "openai/gpt-4o-mini"}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["data"].clone()
    }

    #[tokio::test]
    async fn test_chat_requires_access_token() {
        let app = app();
        let response = app.send(request("GET", "/api/chat/conversations", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No access token");
    }

    #[tokio::test]
    async fn test_create_and_list_conversations() {
        let app = app();
        let token = app.access_token("ann").await;

        let created = start_conversation(&app, &token).await;
        assert_eq!(created["title"], "Greeting");
        assert_eq!(created["messages"][0]["role"], "user");
        assert_eq!(created["messages"][0]["content"], "Hello there");

        let response = app
            .send(request("GET", "/api/chat/conversations", Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_missing_field_gets_error_envelope() {
        let app = app();
        let token = app.access_token("ben").await;

        let response = app
            .send(json_request(
                "POST",
                "/api/chat/conversation",
                Some(&token),
                r#"{"model": "m"}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("content"));
    }

    #[tokio::test]
    async fn test_non_uuid_id_gets_error_envelope() {
        let app = app();
        let token = app.access_token("cy").await;

        let response = app
            .send(request("GET", "/api/chat/conversation/not-a-uuid", Some(&token)))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_send_message_returns_rendered_reply() {
        let app = app();
        let token = app.access_token("dot").await;
        let conversation = start_conversation(&app, &token).await;

        let body = serde_json::json!({
            "conversationId": conversation["id"],
            "model": "openai/gpt-4o-mini",
            "context": [{"role": "user", "content": "Hello there"}],
            "maxTokens": 64
        });
        let response = app
            .send(json_request("POST", "/api/chat/message", Some(&token), &body.to_string()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let message = body_json(response).await["data"]["message"].clone();
        assert_eq!(message["role"], "assistant");
        assert_eq!(message["conversationId"], conversation["id"]);
        assert!(message["content"]
            .as_str()
            .unwrap()
            .contains("<pre><code class=\"hljs language-py\">print(1)</code></pre>"));
    }

    #[tokio::test]
    async fn test_send_message_rejects_non_user_last_turn() {
        let app = app();
        let token = app.access_token("eve").await;
        let conversation = start_conversation(&app, &token).await;

        let body = serde_json::json!({
            "conversationId": conversation["id"],
            "model": "m",
            "context": [{"role": "assistant", "content": "hi"}]
        });
        let response = app
            .send(json_request("POST", "/api/chat/message", Some(&token), &body.to_string()))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rename_and_delete_are_owner_scoped() {
        let app = app();
        let owner = app.access_token("fay").await;
        let other = app.access_token("gus").await;
        let conversation = start_conversation(&app, &owner).await;
        let uri = format!("/api/chat/conversation/{}", conversation["id"].as_str().unwrap());

        let response = app
            .send(json_request("PATCH", &uri, Some(&other), r#"{"title": "Mine"}"#))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = app.send(request("DELETE", &uri, Some(&other))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .send(json_request("PATCH", &uri, Some(&owner), r#"{"title": " Renamed "}"#))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["title"], "Renamed");

        let response = app.send(request("DELETE", &uri, Some(&owner))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], conversation["id"]);

        let response = app.send(request("GET", &uri, Some(&owner))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_message_returns_ids() {
        let app = app();
        let token = app.access_token("hal").await;
        let conversation = start_conversation(&app, &token).await;
        let message_id = conversation["messages"][0]["id"].as_str().unwrap();

        let response = app
            .send(request(
                "DELETE",
                &format!("/api/chat/message/{message_id}"),
                Some(&token),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["id"], message_id);
        assert_eq!(json["data"]["conversationId"], conversation["id"]);
    }
}
