//! Table provisioning.
//!
//! Every table uses the same key schema: `PartitionKey` as the hash key and
//! `RowKey` as the range key, both strings, billed per request.

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use tablecrud_core::storage::{Result, StoreError, PARTITION_KEY_COLUMN, ROW_KEY_COLUMN};

use super::error::{map_create_table_error, map_describe_table_error};

const ACTIVATION_ATTEMPTS: u32 = 60;
const ACTIVATION_DELAY: Duration = Duration::from_secs(2);

/// What `ensure_table` still has to do, given the described table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePlan {
    /// The table is active; no further requests needed.
    Ready,
    /// The table does not exist.
    Create,
    /// The table exists but is not active yet.
    WaitForActive,
}

/// Plans the provisioning steps from a single DescribeTable result.
pub fn plan_table(status: Option<&TableStatus>) -> TablePlan {
    match status {
        Some(TableStatus::Active) => TablePlan::Ready,
        Some(_) => TablePlan::WaitForActive,
        None => TablePlan::Create,
    }
}

/// Fetches the table status, returns None if the table doesn't exist.
pub async fn table_status(client: &Client, table: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table).send().await {
        Ok(response) => Ok(Some(
            response
                .table()
                .and_then(|t| t.table_status())
                .cloned()
                .unwrap_or(TableStatus::Active),
        )),
        Err(err) => match map_describe_table_error(err, table) {
            StoreError::TableNotFound(_) => Ok(None),
            err => Err(err),
        },
    }
}

/// Creates the table. Succeeds if it already exists.
pub async fn create_table(client: &Client, table: &str) -> Result<()> {
    let key_schema = vec![
        key_element(PARTITION_KEY_COLUMN, KeyType::Hash)?,
        key_element(ROW_KEY_COLUMN, KeyType::Range)?,
    ];
    let attribute_definitions = vec![
        string_attribute(PARTITION_KEY_COLUMN)?,
        string_attribute(ROW_KEY_COLUMN)?,
    ];

    let result = client
        .create_table()
        .table_name(table)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => {
            tracing::info!(table, "Created DynamoDB table");
            Ok(())
        }
        Err(err) => match map_create_table_error(err) {
            Some(err) => Err(err),
            None => Ok(()),
        },
    }
}

/// Polls until the table reports `ACTIVE`.
pub async fn wait_for_table_active(client: &Client, table: &str) -> Result<()> {
    for _ in 0..ACTIVATION_ATTEMPTS {
        if let Some(TableStatus::Active) = table_status(client, table).await? {
            return Ok(());
        }
        tracing::debug!(table, "Waiting for table to become active");
        tokio::time::sleep(ACTIVATION_DELAY).await;
    }

    Err(StoreError::QueryFailed(format!(
        "Table {table} did not become active in time"
    )))
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
}

fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_table_needs_nothing_more() {
        assert_eq!(plan_table(Some(&TableStatus::Active)), TablePlan::Ready);
    }

    #[test]
    fn test_missing_table_is_created() {
        assert_eq!(plan_table(None), TablePlan::Create);
    }

    #[test]
    fn test_pending_table_is_awaited() {
        assert_eq!(
            plan_table(Some(&TableStatus::Creating)),
            TablePlan::WaitForActive
        );
        assert_eq!(
            plan_table(Some(&TableStatus::Updating)),
            TablePlan::WaitForActive
        );
    }
}
