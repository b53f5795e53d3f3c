//! In-memory table store implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use tablecrud_core::storage::{
    ContinuationToken, Page, Result, StoreError, TableQuery, TableRow, TableStore, MAX_PAGE_SIZE,
};

type RowKey = (String, String);
type Table = BTreeMap<RowKey, TableRow>;

/// In-memory table store for testing and local demos.
///
/// Rows are kept ordered by `(partition_key, row_key)`, which is the order
/// segments are returned in. Data is not persisted and will be lost when the
/// store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryTableStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
    segment_requests: Arc<AtomicUsize>,
}

impl Default for InMemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTableStore {
    /// Creates an empty store returning up to 1,000 rows per segment.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new() -> Self {
        Self::with_page_size(MAX_PAGE_SIZE)
    }

    /// Creates an empty store returning up to `page_size` rows per segment.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            segment_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of segments served since the store was created.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn segment_requests(&self) -> usize {
        self.segment_requests.load(Ordering::SeqCst)
    }

    /// Number of rows stored in `table`, or `None` if it does not exist.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn row_count(&self, table: &str) -> Option<usize> {
        self.tables.read().await.get(table).map(BTreeMap::len)
    }
}

/// Encodes the last key of a segment as the cursor for the next one.
fn encode_token(key: &RowKey) -> Result<ContinuationToken> {
    serde_json::to_string(&[&key.0, &key.1])
        .map(ContinuationToken::new)
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_token(token: &ContinuationToken) -> Result<RowKey> {
    let [partition_key, row_key]: [String; 2] = serde_json::from_str(token.as_str())
        .map_err(|e| StoreError::Serialization(format!("Invalid continuation token: {e}")))?;
    Ok((partition_key, row_key))
}

/// Copies `row`, keeping only the selected properties.
fn project(row: &TableRow, query: &TableQuery) -> TableRow {
    match query.columns() {
        Some(selection) => TableRow {
            partition_key: row.partition_key.clone(),
            row_key: row.row_key.clone(),
            timestamp: row.timestamp,
            etag: row.etag.clone(),
            properties: row
                .properties
                .iter()
                .filter(|(name, _)| selection.contains(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        },
        None => row.clone(),
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn ensure_table(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.contains_key(table) {
            tables.insert(table.to_string(), Table::new());
            tracing::debug!(table, "Created in-memory table");
        }
        Ok(())
    }

    async fn query_segment(
        &self,
        table: &str,
        query: &TableQuery,
        token: Option<ContinuationToken>,
    ) -> Result<Page<TableRow>> {
        self.segment_requests.fetch_add(1, Ordering::SeqCst);

        let lower = match &token {
            Some(token) => Bound::Excluded(decode_token(token)?),
            None => Bound::Unbounded,
        };

        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let page_size = query.page_size(self.page_size);
        let mut range = rows.range((lower, Bound::Unbounded));
        let items: Vec<TableRow> = range
            .by_ref()
            .take(page_size)
            .map(|(_, row)| project(row, query))
            .collect();

        let continuation = match (range.next(), items.last()) {
            (Some(_), Some(last)) => Some(encode_token(&(
                last.partition_key.clone(),
                last.row_key.clone(),
            ))?),
            _ => None,
        };

        Ok(Page::new(items, continuation))
    }

    async fn insert(&self, table: &str, mut row: TableRow) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let key = (row.partition_key.clone(), row.row_key.clone());
        if rows.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                table: table.to_string(),
                partition_key: key.0,
                row_key: key.1,
            });
        }

        row.timestamp = Some(Utc::now());
        row.etag = Some(format!("W/\"{}\"", Uuid::new_v4()));
        rows.insert(key, row);
        Ok(())
    }
}
