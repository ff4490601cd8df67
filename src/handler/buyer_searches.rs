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
    db::buyersearchdb::BuyerSearchExt,
    dtos::buyersearchdtos::{BuyerMatchesDto, BuyerSearchDto, BuyerSearchFilterParams, BuyerSearchListItemDto},
    error::HttpError,
    handler::properties::list_items,
    models::buyersearchmodel::{BuyerSearch, SearchStatus},
    service::error::ServiceError,
    AppState,
};

pub fn admin_buyer_search_handler() -> Router {
    Router::new()
        .route("/", get(list_buyer_searches).post(create_buyer_search))
        .route(
            "/:search_id",
            get(get_buyer_search).put(update_buyer_search).delete(delete_buyer_search),
        )
        .route("/:search_id/pause", post(pause_buyer_search))
        .route("/:search_id/activate", post(activate_buyer_search))
        .route("/:search_id/fulfill", post(fulfill_buyer_search))
        .route("/:search_id/matches", get(buyer_search_matches))
}

async fn with_matches_count(app_state: &AppState, search: BuyerSearch) -> Result<BuyerSearchListItemDto, HttpError> {
    let count = app_state.listing_service.count_buyer_matches(&search).await?;
    Ok(BuyerSearchListItemDto::new(search, count))
}

async fn load(app_state: &AppState, search_id: Uuid) -> Result<BuyerSearch, HttpError> {
    let search = app_state
        .db_client
        .get_buyer_search(search_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::BuyerSearchNotFound(search_id))?;
    Ok(search)
}

pub async fn list_buyer_searches(
    Query(filter): Query<BuyerSearchFilterParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let status = match filter.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<SearchStatus>().map_err(HttpError::bad_request)?),
        None => None,
    };

    let searches = app_state
        .db_client
        .get_buyer_searches(status, filter.ordering.as_deref())
        .await
        .map_err(ServiceError::from)?;

    let mut results = Vec::with_capacity(searches.len());
    for search in searches {
        results.push(with_matches_count(&app_state, search).await?);
    }

    Ok(Json(serde_json::json!({ "status": "success", "data": results })))
}

pub async fn create_buyer_search(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<BuyerSearchDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let search = app_state
        .db_client
        .create_buyer_search(body)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!("Buyer search {} saved for {}", search.id, search.buyer_name);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": with_matches_count(&app_state, search).await?
    })))
}

pub async fn get_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let search = load(&app_state, search_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": with_matches_count(&app_state, search).await?
    })))
}

pub async fn update_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<BuyerSearchDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let search = app_state
        .db_client
        .update_buyer_search(search_id, body)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::BuyerSearchNotFound(search_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": with_matches_count(&app_state, search).await?
    })))
}

pub async fn delete_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_buyer_search(search_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(ServiceError::BuyerSearchNotFound(search_id).into());
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Buyer search deleted successfully"
    })))
}

async fn set_status(app_state: &AppState, search_id: Uuid, status: SearchStatus) -> Result<impl IntoResponse, HttpError> {
    let search = app_state
        .db_client
        .set_buyer_search_status(search_id, status)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::BuyerSearchNotFound(search_id))?;

    tracing::info!("Buyer search {} is now {}", search_id, status.as_str());

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": with_matches_count(app_state, search).await?
    })))
}

pub async fn pause_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    set_status(&app_state, search_id, SearchStatus::Paused).await
}

pub async fn activate_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    set_status(&app_state, search_id, SearchStatus::Active).await
}

pub async fn fulfill_buyer_search(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    set_status(&app_state, search_id, SearchStatus::Fulfilled).await
}

pub async fn buyer_search_matches(
    Path(search_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let search = load(&app_state, search_id).await?;
    let matches = app_state.listing_service.find_buyer_matches(&search).await?;
    let results = list_items(&app_state, &matches).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": BuyerMatchesDto {
            count: results.len(),
            results,
        }
    })))
}
