use axum::{extract::State, response::IntoResponse, Json};

use crate::errors::ServiceError;
use crate::AppState;

pub async fn list_offers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let offers = state.services.offers.list_active().await?;
    Ok(Json(offers))
}
