use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::offer;
use crate::errors::ServiceError;

/// Read side of promotional offers shown on the storefront.
#[derive(Clone)]
pub struct OfferService {
    db: Arc<DbPool>,
}

impl OfferService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Active offers that have not expired. An offer without an end date
    /// stays live until deactivated.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<offer::Model>, ServiceError> {
        let now = Utc::now();
        let offers = offer::Entity::find()
            .filter(offer::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(offer::Column::EndsAt.is_null())
                    .add(offer::Column::EndsAt.gt(now)),
            )
            .order_by_desc(offer::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(offers)
    }
}
