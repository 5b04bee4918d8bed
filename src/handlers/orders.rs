use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::orders::{PlaceOrderRequest, UpdateOrderStatusRequest};
use crate::AppState;

pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let placed = state.services.orders.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let orders = state.services.orders.list_orders().await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.orders.get_order(id).await?;
    Ok(Json(detail))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.orders.update_status(id, request).await?;
    Ok(Json(updated))
}
