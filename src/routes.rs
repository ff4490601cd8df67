use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        buyer_searches::admin_buyer_search_handler,
        chat::{admin_conversation_handler, chat_handler},
        messages::{admin_message_handler, message_handler},
        notifications::admin_notification_handler,
        properties::{admin_property_handler, property_handler},
    },
    error::HttpError,
    middleware::rate_limit::rate_limit_middleware,
    AppState,
};

// Health check handler
async fn health_check(Extension(app_state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let database = match app_state.db_client.health_check().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "down"
        }
    };

    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "database": database
    }))
}

async fn route_not_found() -> HttpError {
    HttpError::not_found("Route not found")
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let lead_routes = message_handler().route_layer(middleware::from_fn_with_state(
        app_state.lead_limiter.clone(),
        rate_limit_middleware,
    ));

    let admin_routes = Router::new()
        .nest("/properties", admin_property_handler())
        .nest("/messages", admin_message_handler())
        .nest("/conversations", admin_conversation_handler())
        .nest("/buyer-searches", admin_buyer_search_handler())
        .nest("/notifications", admin_notification_handler());

    let api_route = Router::new()
        .nest("/properties", property_handler())
        .nest("/messages", lead_routes)
        .nest("/chat", chat_handler())
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .fallback(route_not_found)
        .layer(Extension(app_state))
}
