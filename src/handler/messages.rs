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
    db::messagedb::MessageExt,
    dtos::{
        messagedtos::{CreateMessageDto, MessageFilterParams},
        optional_flag,
        pagination::PageParams,
    },
    error::HttpError,
    service::error::ServiceError,
    AppState,
};

/// Public lead intake. Throttling is layered on in the router.
pub fn message_handler() -> Router {
    Router::new().route("/", post(create_message))
}

pub fn admin_message_handler() -> Router {
    Router::new()
        .route("/", get(list_messages))
        .route("/:message_id", get(get_message).delete(delete_message))
        .route("/:message_id/mark-read", post(mark_read))
        .route("/:message_id/mark-unread", post(mark_unread))
}

pub async fn create_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let lead = app_state.lead_service.submit(body).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Thank you! We will get back to you shortly.",
        "data": lead
    })))
}

pub async fn list_messages(
    Query(filter): Query<MessageFilterParams>,
    Query(page): Query<PageParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state
        .db_client
        .get_messages(optional_flag(filter.is_read.as_deref()))
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": page.paginate(messages)
    })))
}

pub async fn get_message(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let message = app_state
        .db_client
        .get_message(message_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::MessageNotFound(message_id))?;

    Ok(Json(serde_json::json!({ "status": "success", "data": message })))
}

async fn set_read(app_state: &AppState, message_id: Uuid, is_read: bool) -> Result<impl IntoResponse, HttpError> {
    let message = app_state
        .db_client
        .set_message_read(message_id, is_read)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::MessageNotFound(message_id))?;

    Ok(Json(serde_json::json!({ "status": "success", "data": message })))
}

pub async fn mark_read(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    set_read(&app_state, message_id, true).await
}

pub async fn mark_unread(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    set_read(&app_state, message_id, false).await
}

pub async fn delete_message(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_message(message_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(ServiceError::MessageNotFound(message_id).into());
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Message deleted successfully"
    })))
}
