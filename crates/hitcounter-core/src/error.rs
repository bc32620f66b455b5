use thiserror::Error;

/// Core errors for the hit counter.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("DynamoDB error: {0}")]
    Dynamo(#[from] aws_sdk_dynamodb::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_dynamo::Error),

    #[error("Record decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the error came from talking to the backing store, as opposed
    /// to converting records in-process.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, CoreError::Dynamo(_))
    }
}
