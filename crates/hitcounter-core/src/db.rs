use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::Select;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{HitRecord, Item};
use crate::store::HitStore;

/// DynamoDB client wrapper for hit storage.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
    index_name: Option<String>,
}

impl DynamoStore {
    /// Create a new `DynamoStore` by loading AWS configuration from the
    /// environment and constructing a DynamoDB client.
    pub async fn new(table_name: impl Into<String>, index_name: Option<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::with_client(Client::new(&config), table_name, index_name)
    }

    /// Wrap an existing client.
    pub fn with_client(
        client: Client,
        table_name: impl Into<String>,
        index_name: Option<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            index_name,
        }
    }

    /// The DynamoDB table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The index scanned for history, if any.
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }
}

#[async_trait]
impl HitStore for DynamoStore {
    async fn record_hit(&self, record: &HitRecord) -> Result<(), CoreError> {
        let item = record.to_item()?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        debug!(
            table = %self.table_name,
            path = %record.path,
            millis = record.timestamp_millis,
            "hit recorded"
        );
        Ok(())
    }

    async fn scan_hits(&self) -> Result<Vec<HitRecord>, CoreError> {
        let items: Vec<Item> = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_index_name(self.index_name.clone())
            .select(Select::AllAttributes)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        debug!(table = %self.table_name, count = items.len(), "hits scanned");

        items.iter().map(HitRecord::from_item).collect()
    }
}
