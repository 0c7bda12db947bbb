//! DynamoDB-backed greeting store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::instrument;

use crate::config::{StorageConfig, ATTR_GREETING, ATTR_ID};

use super::{GreetingStore, StorageError};

/// Greeting store over a single DynamoDB table.
///
/// The SDK client is cheap to clone and safe to share across tasks.
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    /// Wrap an already configured SDK client.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Resolve region and credentials from the environment and build a client.
    ///
    /// Resolution follows the SDK default chain; `region` and `endpoint_url`
    /// from `config` take precedence when set. Credentials are resolved here
    /// rather than on the first request so a misconfigured deployment fails
    /// at startup.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::from_sdk_config(&sdk_config, &config.table_name).await
    }

    /// Build a store from loaded SDK configuration.
    ///
    /// Fails with [`StorageError::Init`] when no region is set or credentials
    /// cannot be resolved.
    pub async fn from_sdk_config(
        sdk_config: &SdkConfig,
        table_name: &str,
    ) -> Result<Self, StorageError> {
        let region = sdk_config
            .region()
            .ok_or_else(|| StorageError::Init("no AWS region could be resolved".to_string()))?;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| StorageError::Init("no AWS credentials provider configured".to_string()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| StorageError::Init(format!("failed to resolve AWS credentials: {e}")))?;

        tracing::debug!(
            region = %region,
            endpoint = sdk_config.endpoint_url().unwrap_or("default"),
            "Resolved AWS configuration"
        );

        Ok(Self::new(Client::new(sdk_config), table_name))
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl GreetingStore for DynamoStore {
    #[instrument(name = "dynamodb::put_item", skip(self, value), fields(table = %self.table_name))]
    async fn write_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(ATTR_ID, AttributeValue::N(key.to_string()))
            .item(ATTR_GREETING, AttributeValue::S(value.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "PutItem",
                message: DisplayErrorContext(e).to_string(),
            })?;
        Ok(())
    }

    #[instrument(name = "dynamodb::get_item", skip(self), fields(table = %self.table_name))]
    async fn read_item(&self, key: &str) -> Result<String, StorageError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::N(key.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "GetItem",
                message: DisplayErrorContext(e).to_string(),
            })?;

        greeting_from_item(key, output.item())
    }
}

/// Extract the greeting text from a fetched item.
fn greeting_from_item(
    key: &str,
    item: Option<&HashMap<String, AttributeValue>>,
) -> Result<String, StorageError> {
    let item = item.ok_or_else(|| StorageError::NotFound(key.to_string()))?;
    match item.get(ATTR_GREETING) {
        Some(AttributeValue::S(text)) => Ok(text.clone()),
        other => Err(StorageError::UnexpectedType {
            attribute: ATTR_GREETING,
            found: other.map_or("missing", attribute_kind),
        }),
    }
}

/// DynamoDB type descriptor of an attribute value.
fn attribute_kind(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::B(_) => "B",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::L(_) => "L",
        AttributeValue::M(_) => "M",
        AttributeValue::N(_) => "N",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::S(_) => "S",
        AttributeValue::Ss(_) => "SS",
        _ => "unknown",
    }
}
