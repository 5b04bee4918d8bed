use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::DbPool;
use crate::entities::{customer, notification, order, user};
use crate::errors::ServiceError;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub customer: customer::Model,
    pub orders: Vec<order::Model>,
    pub notifications: Vec<notification::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Account-scoped reads and writes for logged-in shoppers.
#[derive(Clone)]
pub struct ProfileService {
    db: Arc<DbPool>,
}

impl ProfileService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// The customer record with their order and notification history, newest
    /// first. Admin accounts have no customer attached and get a 400.
    #[instrument(skip(self, auth), fields(user_id = %auth.user_id))]
    pub async fn get_profile(&self, auth: &AuthUser) -> Result<ProfileResponse, ServiceError> {
        let Some(customer_id) = auth.customer_id else {
            return Err(ServiceError::ValidationError(
                "Not a customer account".to_string(),
            ));
        };

        let Some(found) = customer::Entity::find_by_id(customer_id)
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound("Customer not found".to_string()));
        };

        let orders = order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let notifications = notification::Entity::find()
            .filter(notification::Column::CustomerId.eq(customer_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(ProfileResponse {
            customer: found,
            orders,
            notifications,
        })
    }

    /// Marks one of the caller's notifications as read. A notification that
    /// belongs to another customer is indistinguishable from a missing one.
    #[instrument(skip(self, auth), fields(user_id = %auth.user_id))]
    pub async fn mark_notification_read(
        &self,
        auth: &AuthUser,
        notification_id: Uuid,
    ) -> Result<(), ServiceError> {
        let Some(customer_id) = auth.customer_id else {
            return Err(ServiceError::ValidationError(
                "Not a customer account".to_string(),
            ));
        };

        let Some(found) = notification::Entity::find_by_id(notification_id)
            .filter(notification::Column::CustomerId.eq(customer_id))
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound(
                "Notification not found".to_string(),
            ));
        };

        let mut updating: notification::ActiveModel = found.into();
        updating.is_read = Set(true);
        updating.update(self.db.as_ref()).await?;
        Ok(())
    }

    /// Rotates the caller's password after checking the current one.
    #[instrument(skip(self, auth, request), fields(user_id = %auth.user_id))]
    pub async fn change_password(
        &self,
        auth: &AuthUser,
        request: ChangePasswordRequest,
    ) -> Result<(), ServiceError> {
        request.validate()?;

        let Some(account) = user::Entity::find_by_id(auth.user_id)
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound("User not found".to_string()));
        };

        if !verify_password(&request.current_password, &account.password_hash)? {
            warn!("password change rejected, current password mismatch");
            return Err(ServiceError::Unauthorized(
                "Current password incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&request.new_password)?;
        let mut updating: user::ActiveModel = account.into();
        updating.password_hash = Set(new_hash);
        updating.update(self.db.as_ref()).await?;

        info!("password updated");
        Ok(())
    }
}
