use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::IndexModel;
use tracing::{info, warn};

use super::models::{PriceQuery, PriceRecord};
use super::DbClient;
use crate::Result;

/// Ascending indexes on `price_data`; `collection_time` backs the date filter
pub const PRICE_INDEX_FIELDS: [&str; 3] = ["timestamp", "item_id", "collection_time"];

impl DbClient {
    pub async fn ensure_indexes(&self) -> Result<()> {
        let models: Vec<IndexModel> = PRICE_INDEX_FIELDS
            .iter()
            .map(|field| {
                let mut keys = Document::new();
                keys.insert(*field, 1);
                IndexModel::builder().keys(keys).build()
            })
            .collect();

        self.price_data().create_indexes(models, None).await?;
        info!("MongoDB database initialized successfully");
        Ok(())
    }

    /// Insert a batch of records, returning how many were written
    pub async fn insert_price_records(&self, records: &[PriceRecord]) -> Result<usize> {
        if records.is_empty() {
            warn!("No documents to insert");
            return Ok(0);
        }

        let result = self.price_data().insert_many(records, None).await?;
        info!("Saved {} price records to MongoDB", result.inserted_ids.len());
        Ok(result.inserted_ids.len())
    }

    pub async fn find_price_records(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>> {
        let cursor = self.price_data().find(query.to_filter(), None).await?;
        let records: Vec<PriceRecord> = cursor.try_collect().await?;

        info!("Retrieved {} price records from MongoDB", records.len());
        Ok(records)
    }
}
