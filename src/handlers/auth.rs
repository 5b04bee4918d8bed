use axum::{extract::State, response::IntoResponse, Json};

use crate::auth::LoginRequest;
use crate::errors::ServiceError;
use crate::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.auth.login(&request).await?;
    Ok(Json(response))
}
