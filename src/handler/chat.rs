use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        chatdtos::{ConversationFilterParams, ReplyDto, SendChatMessageDto, StartConversationDto},
        optional_flag,
    },
    error::HttpError,
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new()
        .route("/start", post(start_conversation))
        .route("/send", post(send_message))
        .route("/:session_id", get(get_visitor_conversation))
}

pub fn admin_conversation_handler() -> Router {
    Router::new()
        .route("/", get(list_conversations))
        .route("/unread-count", get(unread_count))
        .route("/:conversation_id", get(get_conversation).delete(delete_conversation))
        .route("/:conversation_id/reply", post(reply))
}

pub async fn start_conversation(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<StartConversationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let conversation = app_state.chat_service.start(body).await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": conversation })))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SendChatMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let message = app_state.chat_service.send(body).await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": message })))
}

pub async fn get_visitor_conversation(
    Path(session_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let conversation = app_state.chat_service.visitor_view(&session_id).await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": conversation })))
}

pub async fn list_conversations(
    Query(filter): Query<ConversationFilterParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let conversations = app_state
        .chat_service
        .list(optional_flag(filter.has_unread.as_deref()))
        .await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": conversations })))
}

pub async fn get_conversation(
    Path(conversation_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let conversation = app_state.chat_service.admin_view(conversation_id).await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": conversation })))
}

pub async fn reply(
    Path(conversation_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ReplyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let message = app_state.chat_service.reply(conversation_id, &body.content).await?;

    Ok(Json(serde_json::json!({ "status": "success", "data": message })))
}

pub async fn delete_conversation(
    Path(conversation_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.chat_service.delete(conversation_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Conversation deleted successfully"
    })))
}

pub async fn unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state.chat_service.unread_count().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "unread_count": count }
    })))
}
