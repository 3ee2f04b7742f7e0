use crate::core::traits::CatalogStore;
use crate::core::types::{CategoryId, CategoryRef, CommitOutcome, EnrichedRecord};
use crate::utils::error::{PipelineError, Result};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, category::category_path};
use super::types::SeaOrmCatalogStore;

impl From<entities::product::Model> for EnrichedRecord {
    fn from(model: entities::product::Model) -> Self {
        Self {
            code: model.code,
            source_name: model.source_name,
            name: model.name,
            description: model.description,
            category_id: model.category_id,
            category_name: model.category_name,
            brand: model.brand,
            image_url: model.image_url,
            unit: model.unit,
            price: model.price,
            row_index: model.row_index.max(0) as usize,
            committed_at: Some(model.committed_at.with_timezone(&Utc)),
        }
    }
}

impl SeaOrmCatalogStore {
    /// Number of committed products
    pub async fn product_count(&self) -> Result<u64> {
        entities::Product::find()
            .count(&self.db)
            .await
            .map_err(PipelineError::Database)
    }

    /// Look up a product by code
    pub async fn find_product(&self, code: &str) -> Result<Option<EnrichedRecord>> {
        let model = entities::Product::find()
            .filter(entities::product::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(PipelineError::Database)?;
        Ok(model.map(EnrichedRecord::from))
    }

    async fn find_category(&self, path: &str) -> Result<Option<CategoryId>> {
        let model = entities::Category::find()
            .filter(entities::category::Column::Path.eq(path))
            .one(&self.db)
            .await
            .map_err(PipelineError::Database)?;
        Ok(model.map(|c| c.id))
    }

    /// Insert unless the path exists, then read the id back
    async fn upsert_category(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
        path: String,
    ) -> Result<CategoryId> {
        if let Some(id) = self.find_category(&path).await? {
            return Ok(id);
        }

        let active_model = entities::category::ActiveModel {
            name: Set(name.to_string()),
            parent_id: Set(parent_id),
            path: Set(path.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        // Another worker may create the same category concurrently
        entities::Category::insert(active_model)
            .on_conflict(
                OnConflict::column(entities::category::Column::Path)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(PipelineError::Database)?;

        self.find_category(&path)
            .await?
            .ok_or_else(|| PipelineError::category(format!("category '{}' was not created", path)))
    }
}

#[async_trait::async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    async fn find_most_recent_committed(&self) -> Result<Option<EnrichedRecord>> {
        let model = entities::Product::find()
            .order_by_desc(entities::product::Column::CommittedAt)
            .order_by_desc(entities::product::Column::Id)
            .one(&self.db)
            .await
            .map_err(PipelineError::Database)?;
        Ok(model.map(EnrichedRecord::from))
    }

    async fn is_committed(&self, code: &str) -> Result<bool> {
        let count = entities::Product::find()
            .filter(entities::product::Column::Code.eq(code))
            .count(&self.db)
            .await
            .map_err(PipelineError::Database)?;
        Ok(count > 0)
    }

    async fn commit(&self, record: &EnrichedRecord) -> Result<CommitOutcome> {
        if self.is_committed(&record.code).await? {
            return Ok(CommitOutcome::AlreadyPresent);
        }

        let active_model = entities::product::ActiveModel {
            code: Set(record.code.clone()),
            source_name: Set(record.source_name.clone()),
            name: Set(record.name.clone()),
            description: Set(record.description.clone()),
            category_id: Set(record.category_id),
            category_name: Set(record.category_name.clone()),
            brand: Set(record.brand.clone()),
            image_url: Set(record.image_url.clone()),
            unit: Set(record.unit.clone()),
            price: Set(record.price),
            row_index: Set(record.row_index as i64),
            committed_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let inserted = entities::Product::insert(active_model)
            .on_conflict(
                OnConflict::column(entities::product::Column::Code)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(PipelineError::Database)?;

        if inserted == 0 {
            return Ok(CommitOutcome::AlreadyPresent);
        }

        debug!(code = %record.code, row_index = record.row_index, "Product committed");
        Ok(CommitOutcome::Inserted)
    }

    async fn ensure_category_exists(&self, category: &CategoryRef) -> Result<CategoryId> {
        let parent_id = match category.parent.as_deref() {
            Some(parent) => Some(
                self.upsert_category(parent, None, category_path(parent, None))
                    .await?,
            ),
            None => None,
        };

        let path = category_path(&category.name, category.parent.as_deref());
        self.upsert_category(&category.name, parent_id, path).await
    }
}
