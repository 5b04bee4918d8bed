use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::common::MessageResponse;
use crate::services::profile::ChangePasswordRequest;
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.services.profile.get_profile(&auth).await?;
    Ok(Json(profile))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .profile
        .mark_notification_read(&auth, id)
        .await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .profile
        .change_password(&auth, request)
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
