use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{order_item, product};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: i32,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub est_year: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub stock: i32,
    pub emoji: Option<String>,
    pub image_url: Option<String>,
    pub est_year: Option<i32>,
}

fn check_price_and_stock(price: Decimal, stock: i32) -> Result<(), ServiceError> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Price must be greater than zero".to_string(),
        ));
    }
    if stock < 0 {
        return Err(ServiceError::ValidationError(
            "Stock cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Catalog management.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        let products = product::Entity::find()
            .order_by_asc(product::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        request.validate()?;
        check_price_and_stock(request.price, request.stock)?;

        let created = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            price: Set(request.price),
            category: Set(request.category),
            stock: Set(request.stock),
            emoji: Set(request.emoji),
            image_url: Set(request.image_url),
            est_year: Set(request.est_year),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        request.validate()?;
        check_price_and_stock(request.price, request.stock)?;

        let existing = self.get_product(product_id).await?;
        let mut updating: product::ActiveModel = existing.into();
        updating.name = Set(request.name);
        updating.description = Set(request.description);
        updating.price = Set(request.price);
        updating.category = Set(request.category);
        updating.stock = Set(request.stock);
        updating.emoji = Set(request.emoji);
        updating.image_url = Set(request.image_url);
        updating.est_year = Set(request.est_year);

        Ok(updating.update(self.db.as_ref()).await?)
    }

    /// Deletes a product unless any order line still references it. Past
    /// orders keep their snapshots intact, so a referenced product can only
    /// be removed once its orders are gone.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_product(product_id).await?;

        let references = order_item::Entity::find()
            .filter(order_item::Column::ProductId.eq(product_id))
            .count(self.db.as_ref())
            .await?;
        if references > 0 {
            return Err(ServiceError::Conflict(
                "Product is referenced by existing orders and cannot be deleted".to_string(),
            ));
        }

        existing.delete(self.db.as_ref()).await?;
        info!(%product_id, "product deleted");
        Ok(())
    }
}
