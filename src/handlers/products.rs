use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::common::MessageResponse;
use crate::services::products::{CreateProductRequest, UpdateProductRequest};
use crate::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.products.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let found = state.services.products.get_product(id).await?;
    Ok(Json(found))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.products.create_product(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.products.update_product(id, request).await?;
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
