use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::propertydb::{PropertyExt, PropertyImageExt},
    dtos::{
        pagination::PageParams,
        propertydtos::{
            CreateImageDto, ListingStatusDto, PropertyDetailDto, PropertyDto, PropertyListItemDto,
            ReorderImagesDto, SchedulePublishDto, UpdateImageDto,
        },
    },
    error::{ErrorMessage, HttpError},
    models::propertymodel::{ListingStatus, Property},
    search::{ListingQueryParams, ListingScope},
    service::error::ServiceError,
    AppState,
};

pub fn property_handler() -> Router {
    Router::new()
        .route("/", get(list_published_properties))
        .route("/:slug", get(get_published_property))
}

pub fn admin_property_handler() -> Router {
    Router::new()
        .route("/", get(admin_list_properties).post(create_property))
        .route(
            "/:property_id",
            get(admin_get_property).put(update_property).delete(delete_property),
        )
        .route("/:property_id/duplicate", post(duplicate_property))
        .route("/:property_id/toggle-featured", post(toggle_featured))
        .route("/:property_id/publish", post(publish_property))
        .route("/:property_id/mark-sold", post(mark_property_sold))
        .route("/:property_id/archive", post(archive_property))
        .route("/:property_id/schedule-publish", post(schedule_publish))
        .route("/:property_id/listing-status", put(set_listing_status))
        .route("/:property_id/images", get(list_images).post(add_image))
        .route("/:property_id/images/reorder", post(reorder_images))
        .route("/:property_id/images/:image_id", put(update_image).delete(delete_image))
}

/// Listing cards with their cover image, in the order given.
pub(crate) async fn list_items(
    app_state: &AppState,
    properties: &[Property],
) -> Result<Vec<PropertyListItemDto>, HttpError> {
    let ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
    let mut covers = app_state
        .db_client
        .get_cover_images(&ids)
        .await
        .map_err(ServiceError::from)?;

    Ok(properties
        .iter()
        .map(|p| PropertyListItemDto::from_property(p, covers.remove(&p.id)))
        .collect())
}

async fn detail(app_state: &AppState, property: Property) -> Result<PropertyDetailDto, HttpError> {
    let images = app_state
        .db_client
        .get_property_images(property.id)
        .await
        .map_err(ServiceError::from)?;
    Ok(PropertyDetailDto::new(property, images))
}

async fn search_page(
    app_state: &AppState,
    scope: ListingScope,
    params: &ListingQueryParams,
    page: PageParams,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state.listing_service.search(scope, params).await?;
    let page = page.paginate(properties);
    let results = list_items(app_state, &page.results).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": page.with_results(results)
    })))
}

fn property_not_found(property_id: Uuid) -> HttpError {
    ServiceError::PropertyNotFound(property_id.to_string()).into()
}

pub async fn list_published_properties(
    Query(params): Query<ListingQueryParams>,
    Query(page): Query<PageParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    search_page(&app_state, ListingScope::Public, &params, page).await
}

pub async fn get_published_property(
    Path(slug): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .view_published_property(&slug)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::PropertyNotFound(slug))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": detail(&app_state, property).await?
    })))
}

pub async fn admin_list_properties(
    Query(params): Query<ListingQueryParams>,
    Query(page): Query<PageParams>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    search_page(&app_state, ListingScope::Admin, &params, page).await
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<PropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let property = app_state
        .db_client
        .create_property(body)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!("Property {} created as {}", property.slug, property.listing_status.as_str());

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property created successfully",
        "data": detail(&app_state, property).await?
    })))
}

pub async fn admin_get_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": detail(&app_state, property).await?
    })))
}

pub async fn update_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<PropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let property = app_state
        .db_client
        .update_property(property_id, body)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property updated successfully",
        "data": detail(&app_state, property).await?
    })))
}

pub async fn delete_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_property(property_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(property_not_found(property_id));
    }

    tracing::info!("Property {} deleted", property_id);

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deleted successfully"
    })))
}

pub async fn duplicate_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let copy = app_state
        .db_client
        .duplicate_property(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    tracing::info!("Property {} duplicated as {}", property_id, copy.slug);

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property duplicated as a draft",
        "data": detail(&app_state, copy).await?
    })))
}

pub async fn toggle_featured(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .toggle_featured(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "id": property.id,
            "featured": property.featured
        }
    })))
}

async fn transition(
    app_state: &AppState,
    property_id: Uuid,
    status: ListingStatus,
) -> Result<PropertyListItemDto, HttpError> {
    let property = app_state
        .db_client
        .set_listing_status(property_id, status)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    tracing::info!("Property {} is now {}", property.slug, status.as_str());

    let mut items = list_items(app_state, std::slice::from_ref(&property)).await?;
    items.pop().ok_or_else(|| property_not_found(property_id))
}

pub async fn publish_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = transition(&app_state, property_id, ListingStatus::Published).await?;
    Ok(Json(serde_json::json!({ "status": "success", "data": property })))
}

pub async fn mark_property_sold(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = transition(&app_state, property_id, ListingStatus::Sold).await?;
    Ok(Json(serde_json::json!({ "status": "success", "data": property })))
}

pub async fn archive_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = transition(&app_state, property_id, ListingStatus::Archived).await?;
    Ok(Json(serde_json::json!({ "status": "success", "data": property })))
}

pub async fn set_listing_status(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ListingStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = transition(&app_state, property_id, body.listing_status).await?;
    Ok(Json(serde_json::json!({ "status": "success", "data": property })))
}

pub async fn schedule_publish(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SchedulePublishDto>,
) -> Result<impl IntoResponse, HttpError> {
    if body.scheduled_publish_at <= chrono::Utc::now() {
        return Err(HttpError::bad_request(ErrorMessage::SchedulePublishInPast.to_string()));
    }

    let property = app_state
        .db_client
        .schedule_publish(property_id, body.scheduled_publish_at)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    tracing::info!("Property {} scheduled for {}", property.slug, body.scheduled_publish_at);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "id": property.id,
            "listing_status": property.listing_status,
            "scheduled_publish_at": property.scheduled_publish_at
        }
    })))
}

pub async fn list_images(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let images = app_state
        .db_client
        .get_property_images(property_id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({ "status": "success", "data": images })))
}

pub async fn add_image(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateImageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| property_not_found(property_id))?;

    let image = app_state
        .db_client
        .add_property_image(property_id, body)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({ "status": "success", "data": image })))
}

pub async fn update_image(
    Path((property_id, image_id)): Path<(Uuid, Uuid)>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateImageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()?;

    let image = app_state
        .db_client
        .update_property_image(property_id, image_id, body)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::ImageNotFound(image_id))?;

    Ok(Json(serde_json::json!({ "status": "success", "data": image })))
}

pub async fn delete_image(
    Path((property_id, image_id)): Path<(Uuid, Uuid)>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_property_image(property_id, image_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(ServiceError::ImageNotFound(image_id).into());
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Image deleted successfully"
    })))
}

pub async fn reorder_images(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ReorderImagesDto>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .reorder_property_images(property_id, &body.order)
        .await
        .map_err(ServiceError::from)?;

    let images = app_state
        .db_client
        .get_property_images(property_id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({ "status": "success", "data": images })))
}
