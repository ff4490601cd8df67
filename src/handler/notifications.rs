use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    db::notificationdb::{NotificationExt, NotificationFilter},
    dtos::{
        notificationdtos::{MarkAllReadDto, NotificationFilterParams, NotificationListItemDto},
        optional_flag,
        pagination::PageParams,
    },
    error::HttpError,
    models::notificationmodel::{NotificationType, Priority},
    service::error::ServiceError,
    AppState,
};

pub fn admin_notification_handler() -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/mark-all-read", post(mark_all_read))
        .route("/:notification_id", delete(delete_notification))
        .route("/:notification_id/mark-read", post(mark_read))
}

fn parse_filter(params: &NotificationFilterParams) -> Result<NotificationFilter, HttpError> {
    fn present(raw: &Option<String>) -> Option<&str> {
        raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    Ok(NotificationFilter {
        is_read: optional_flag(params.is_read.as_deref()),
        notification_type: present(&params.notification_type)
            .map(str::parse::<NotificationType>)
            .transpose()
            .map_err(HttpError::bad_request)?,
        priority: present(&params.priority)
            .map(str::parse::<Priority>)
            .transpose()
            .map_err(HttpError::bad_request)?,
    })
}

pub async fn list_notifications(
    Query(params): Query<NotificationFilterParams>,
    Query(page): Query<PageParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let filter = parse_filter(&params)?;

    let notifications = app_state
        .db_client
        .get_notifications(filter)
        .await
        .map_err(ServiceError::from)?;

    let now = chrono::Utc::now();
    let items: Vec<NotificationListItemDto> = notifications
        .into_iter()
        .map(|n| NotificationListItemDto::from_notification(n, now))
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": page.paginate(items)
    })))
}

pub async fn unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let counts = app_state
        .db_client
        .get_unread_counts()
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({ "status": "success", "data": counts })))
}

pub async fn mark_read(
    Path(notification_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .db_client
        .mark_notification_read(notification_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotificationNotFound(notification_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": NotificationListItemDto::from_notification(notification, chrono::Utc::now())
    })))
}

/// HIGH priority notifications stay unread unless the body opts in.
pub async fn mark_all_read(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Option<Json<MarkAllReadDto>>,
) -> Result<impl IntoResponse, HttpError> {
    let include_high_priority = body.map(|Json(dto)| dto.include_high_priority).unwrap_or(false);

    let updated = app_state
        .db_client
        .mark_all_notifications_read(include_high_priority)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "updated": updated }
    })))
}

pub async fn delete_notification(
    Path(notification_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_notification(notification_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(ServiceError::NotificationNotFound(notification_id).into());
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Notification deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> NotificationFilterParams {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn parses_filters_from_the_query_string() {
        let filter = parse_filter(&params("is_read=false&type=new_chat&priority=HIGH")).unwrap();
        assert_eq!(filter.is_read, Some(false));
        assert_eq!(filter.notification_type, Some(NotificationType::NewChat));
        assert_eq!(filter.priority, Some(Priority::High));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = parse_filter(&params("is_read=&type=")).unwrap();
        assert_eq!(filter.is_read, None);
        assert_eq!(filter.notification_type, None);
        assert_eq!(filter.priority, None);
    }

    #[test]
    fn unknown_type_is_a_bad_request() {
        let err = parse_filter(&params("type=SPAM")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
