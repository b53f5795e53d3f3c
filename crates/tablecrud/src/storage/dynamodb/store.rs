//! DynamoDB table store implementation.
//!
//! Implements `TableStore` from `tablecrud_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use uuid::Uuid;

use tablecrud_core::storage::{
    ConnectionSettings, ContinuationToken, Page, Result, TableQuery, TableRow, TableStore,
    MAX_PAGE_SIZE,
};

use super::conversions::{item_to_row, key_to_token, projection_expression, row_to_item, token_to_key};
use super::error::{map_put_item_error, map_scan_error};
use super::schema::{self, TablePlan};

/// DynamoDB-based table store.
///
/// Each logical table maps to one DynamoDB table. Segments are read with
/// `Scan`, so rows come back in DynamoDB's hash order, not key order.
pub struct DynamoDbTableStore {
    client: Client,
    page_size: usize,
}

impl DynamoDbTableStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Creates a new store from parsed connection settings.
    ///
    /// Credentials come from the AWS SDK default credential chain.
    pub async fn from_settings(settings: &ConnectionSettings, page_size: usize) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()));

        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::info!(target = %settings.target_display(), "Configured DynamoDB client");

        Self::new(Client::new(&sdk_config), page_size)
    }
}

#[async_trait]
impl TableStore for DynamoDbTableStore {
    async fn ensure_table(&self, table: &str) -> Result<()> {
        let status = schema::table_status(&self.client, table).await?;
        match schema::plan_table(status.as_ref()) {
            TablePlan::Ready => Ok(()),
            TablePlan::Create => {
                schema::create_table(&self.client, table).await?;
                schema::wait_for_table_active(&self.client, table).await
            }
            TablePlan::WaitForActive => schema::wait_for_table_active(&self.client, table).await,
        }
    }

    async fn query_segment(
        &self,
        table: &str,
        query: &TableQuery,
        token: Option<ContinuationToken>,
    ) -> Result<Page<TableRow>> {
        let start_key = token.as_ref().map(token_to_key).transpose()?;
        let limit = query.page_size(self.page_size) as i32;

        let mut request = self
            .client
            .scan()
            .table_name(table)
            .limit(limit)
            .set_exclusive_start_key(start_key);

        if let Some(selection) = query.columns() {
            let (expression, names) = projection_expression(selection);
            request = request
                .projection_expression(expression)
                .set_expression_attribute_names(Some(names));
        }

        let result = request
            .send()
            .await
            .map_err(|e| map_scan_error(e, table))?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_row)
            .collect::<Result<Vec<_>>>()?;

        let continuation = result
            .last_evaluated_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(key_to_token)
            .transpose()?;

        tracing::trace!(
            table,
            rows = items.len(),
            more = continuation.is_some(),
            "Scanned segment"
        );

        Ok(Page::new(items, continuation))
    }

    async fn insert(&self, table: &str, mut row: TableRow) -> Result<()> {
        row.timestamp = Some(Utc::now());
        row.etag = Some(format!("W/\"{}\"", Uuid::new_v4()));
        let item = row_to_item(&row);

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PartitionKey)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table, &row.partition_key, &row.row_key))?;

        Ok(())
    }
}
