use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set, TransactionTrait};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::store_setting;
use crate::errors::ServiceError;

/// Key/value store configuration, read by the storefront and edited from the
/// dashboard.
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DbPool>,
}

impl SettingsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// All settings flattened to a single JSON object.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<HashMap<String, String>, ServiceError> {
        let rows = store_setting::Entity::find().all(self.db.as_ref()).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.setting_key, row.setting_value))
            .collect())
    }

    /// Upserts every submitted key in one transaction, so a partial update is
    /// never visible.
    #[instrument(skip(self, settings), fields(keys = settings.len()))]
    pub async fn upsert_many(
        &self,
        settings: HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        if settings.is_empty() {
            return Err(ServiceError::ValidationError(
                "No settings provided".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;
        for (key, value) in settings {
            let row = store_setting::ActiveModel {
                setting_key: Set(key),
                setting_value: Set(value),
                updated_at: Set(now),
            };
            store_setting::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(store_setting::Column::SettingKey)
                        .update_columns([
                            store_setting::Column::SettingValue,
                            store_setting::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
