use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::HitRecord;

/// Storage for recorded hits.
#[async_trait]
pub trait HitStore: Send + Sync {
    /// Write a hit under its composite key, replacing any record already
    /// stored under the same key.
    async fn record_hit(&self, record: &HitRecord) -> Result<(), CoreError>;

    /// Read every stored hit, in no particular order.
    async fn scan_hits(&self) -> Result<Vec<HitRecord>, CoreError>;
}
