use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::gallery_item::{self, MediaType};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryItemRequest {
    #[validate(length(min = 1, message = "Media URL is required"))]
    pub url: String,
    /// Defaults to an image when the client leaves it out.
    pub media_type: Option<MediaType>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Storefront gallery management.
#[derive(Clone)]
pub struct GalleryService {
    db: Arc<DbPool>,
}

impl GalleryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<gallery_item::Model>, ServiceError> {
        let items = gallery_item::Entity::find()
            .order_by_desc(gallery_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(items)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_item(
        &self,
        request: CreateGalleryItemRequest,
    ) -> Result<gallery_item::Model, ServiceError> {
        request.validate()?;

        let created = gallery_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            url: Set(request.url),
            media_type: Set(request.media_type.unwrap_or(MediaType::Image)),
            title: Set(request.title),
            description: Set(request.description),
            thumbnail_url: Set(request.thumbnail_url),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(item_id = %created.id, "gallery item created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let Some(existing) = gallery_item::Entity::find_by_id(item_id)
            .one(self.db.as_ref())
            .await?
        else {
            return Err(ServiceError::NotFound(
                "Gallery item not found".to_string(),
            ));
        };

        existing.delete(self.db.as_ref()).await?;
        info!(%item_id, "gallery item deleted");
        Ok(())
    }
}
