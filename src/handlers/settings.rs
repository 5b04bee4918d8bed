use std::collections::HashMap;

use axum::{extract::State, response::IntoResponse, Json};

use crate::errors::ServiceError;
use crate::handlers::common::MessageResponse;
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.settings.get_all().await?;
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<HashMap<String, String>>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.settings.upsert_many(settings).await?;
    Ok(Json(MessageResponse::new("Settings updated successfully")))
}
