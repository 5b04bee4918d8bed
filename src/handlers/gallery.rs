use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::common::MessageResponse;
use crate::services::gallery::CreateGalleryItemRequest;
use crate::AppState;

pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.gallery.list_items().await?;
    Ok(Json(items))
}

pub async fn create_gallery_item(
    State(state): State<AppState>,
    Json(request): Json<CreateGalleryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.gallery.create_item(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.gallery.delete_item(id).await?;
    Ok(Json(MessageResponse::new("Gallery item deleted")))
}
