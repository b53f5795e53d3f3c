//! Customer data access over a [`TableStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::storage::{
    fetch_all, validate_table_name, CancelSignal, ColumnSelection, Properties, Result, TableQuery,
    TableStore,
};

use super::conversions::{customer_to_row, rows_to_customers};
use super::operations::{filter_by_partition_key_contains, first_name_and_email, validate_customer};
use super::types::{CustomerRecord, CUSTOMER_COLUMNS, EMAIL_COLUMN, FIRST_NAME_COLUMN};

/// Customer operations against a table store.
///
/// Holds no state besides the store handle: cloning is cheap and independent
/// calls never share mutable data. Every operation validates the table name
/// and creates the table if it is absent before touching it.
#[derive(Clone)]
pub struct CustomerTables {
    store: Arc<dyn TableStore>,
}

impl CustomerTables {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Lists the customers of a single segment (at most one page).
    ///
    /// This is partial for tables larger than one page; use
    /// [`list_all_paginated`](Self::list_all_paginated) for the complete set.
    pub async fn list_all(&self, table: &str) -> Result<Vec<CustomerRecord>> {
        self.open_table(table).await?;

        let page = self
            .store
            .query_segment(table, &TableQuery::all(), None)
            .await?;

        tracing::debug!(
            table,
            rows = page.items.len(),
            partial = !page.is_last(),
            "Listed single segment"
        );

        rows_to_customers(page.items)
    }

    /// Lists every customer in the table, following continuation tokens.
    ///
    /// Pages are fetched one after the other. A failed fetch or a triggered
    /// `cancel` aborts the whole listing.
    pub async fn list_all_paginated(
        &self,
        table: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<CustomerRecord>> {
        self.open_table(table).await?;
        self.fetch_all_customers(table, cancel).await
    }

    /// Lists one segment restricted to `columns`, mapping each row through `resolver`.
    ///
    /// Every entry of `columns` must be a single known column name.
    pub async fn list_projected<T, S, F>(
        &self,
        table: &str,
        columns: &[S],
        resolver: F,
    ) -> Result<Vec<T>>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, Option<DateTime<Utc>>, &Properties) -> T,
    {
        let selection = ColumnSelection::new(columns, CUSTOMER_COLUMNS)?;
        self.open_table(table).await?;

        let query = TableQuery::all().select(selection);
        let page = self.store.query_segment(table, &query, None).await?;

        tracing::debug!(table, rows = page.items.len(), "Listed projected segment");

        Ok(page
            .items
            .iter()
            .map(|row| {
                resolver(
                    &row.partition_key,
                    &row.row_key,
                    row.timestamp,
                    &row.properties,
                )
            })
            .collect())
    }

    /// Lists `"{first_name},{email}"` for the customers of one segment.
    pub async fn list_customer_emails(&self, table: &str) -> Result<Vec<String>> {
        self.list_projected(table, &[FIRST_NAME_COLUMN, EMAIL_COLUMN], first_name_and_email)
            .await
    }

    /// Lists the customers whose partition key contains `fragment`.
    ///
    /// Despite the name this is a substring match. Filtering happens
    /// client-side over the complete listing, so a triggered `cancel` aborts
    /// it like [`list_all_paginated`](Self::list_all_paginated).
    pub async fn filter_by_key_prefix(
        &self,
        table: &str,
        fragment: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<CustomerRecord>> {
        self.open_table(table).await?;
        let customers = self.fetch_all_customers(table, cancel).await?;
        let matched = filter_by_partition_key_contains(customers, fragment);

        tracing::debug!(table, fragment, matched = matched.len(), "Filtered customers");

        Ok(matched)
    }

    /// Inserts a single customer.
    ///
    /// Fails with `AlreadyExists` if the key is taken. Not retried.
    pub async fn insert(&self, table: &str, record: &CustomerRecord) -> Result<()> {
        validate_customer(record)?;
        self.open_table(table).await?;

        self.store.insert(table, customer_to_row(record)).await?;

        tracing::debug!(
            table,
            partition_key = %record.partition_key,
            row_key = %record.row_key,
            "Customer inserted"
        );

        Ok(())
    }

    /// Validates the table name and creates the table if it is absent.
    pub async fn open_table(&self, table: &str) -> Result<()> {
        validate_table_name(table)?;
        self.store.ensure_table(table).await
    }

    async fn fetch_all_customers(
        &self,
        table: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<CustomerRecord>> {
        let query = TableQuery::all();
        let rows = fetch_all(
            |token| self.store.query_segment(table, &query, token),
            cancel,
        )
        .await?;
        rows_to_customers(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::{
        cancel_pair, ContinuationToken, Page, PropertyValue, StoreError, TableRow,
    };

    /// Minimal store: one table map, fixed page size, token = next index.
    struct StubStore {
        rows: Mutex<BTreeMap<(String, String), TableRow>>,
        tables: Mutex<Vec<String>>,
        page_size: usize,
        segment_calls: AtomicUsize,
        fail_on_segment: Option<usize>,
        last_query: Mutex<Option<TableQuery>>,
    }

    impl StubStore {
        fn new(page_size: usize) -> Self {
            Self {
                rows: Mutex::new(BTreeMap::new()),
                tables: Mutex::new(Vec::new()),
                page_size,
                segment_calls: AtomicUsize::new(0),
                fail_on_segment: None,
                last_query: Mutex::new(None),
            }
        }

        fn failing_on(mut self, segment: usize) -> Self {
            self.fail_on_segment = Some(segment);
            self
        }

        fn segment_calls(&self) -> usize {
            self.segment_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TableStore for StubStore {
        async fn ensure_table(&self, table: &str) -> Result<()> {
            let mut tables = self.tables.lock().unwrap();
            if !tables.iter().any(|t| t == table) {
                tables.push(table.to_string());
            }
            Ok(())
        }

        async fn query_segment(
            &self,
            _table: &str,
            query: &TableQuery,
            token: Option<ContinuationToken>,
        ) -> Result<Page<TableRow>> {
            let call = self.segment_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_segment == Some(call) {
                return Err(StoreError::ConnectionFailed("connection reset".to_string()));
            }
            *self.last_query.lock().unwrap() = Some(query.clone());

            let start: usize = token.map(|t| t.as_str().parse().unwrap()).unwrap_or(0);
            let rows = self.rows.lock().unwrap();
            let page: Vec<TableRow> = rows
                .values()
                .skip(start)
                .take(self.page_size)
                .map(|row| match query.columns() {
                    Some(selection) => TableRow {
                        properties: row
                            .properties
                            .iter()
                            .filter(|(name, _)| selection.contains(name))
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                        ..row.clone()
                    },
                    None => row.clone(),
                })
                .collect();
            let next = start + page.len();
            let continuation =
                (next < rows.len()).then(|| ContinuationToken::new(next.to_string()));
            Ok(Page::new(page, continuation))
        }

        async fn insert(&self, table: &str, mut row: TableRow) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            let key = (row.partition_key.clone(), row.row_key.clone());
            if rows.contains_key(&key) {
                return Err(StoreError::AlreadyExists {
                    table: table.to_string(),
                    partition_key: key.0,
                    row_key: key.1,
                });
            }
            row.etag = Some(format!("etag-{}", rows.len()));
            rows.insert(key, row);
            Ok(())
        }
    }

    fn customers(n: usize) -> Vec<CustomerRecord> {
        (0..n)
            .map(|i| {
                CustomerRecord::new(
                    format!("customer-{:03}", i),
                    format!("{:03}", i),
                    format!("Name{}", i),
                    format!("name{}@x.com", i),
                )
            })
            .collect()
    }

    async fn seeded(page_size: usize, n: usize) -> (Arc<StubStore>, CustomerTables) {
        let store = Arc::new(StubStore::new(page_size));
        let tables = CustomerTables::new(store.clone());
        for customer in customers(n) {
            tables.insert("customer", &customer).await.unwrap();
        }
        (store, tables)
    }

    #[tokio::test]
    async fn test_paginated_returns_every_inserted_record() {
        let (store, tables) = seeded(3, 10).await;

        let listed = tables
            .list_all_paginated("customer", &CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(listed.len(), 10);
        for (listed, inserted) in listed.iter().zip(customers(10)) {
            assert!(listed.same_customer(&inserted));
            assert!(listed.version_tag.is_some());
        }
        // 10 rows in pages of 3: 3 + 3 + 3 + 1
        assert_eq!(store.segment_calls(), 4);
    }

    #[tokio::test]
    async fn test_list_all_returns_at_most_one_page() {
        let (store, tables) = seeded(3, 10).await;

        let listed = tables.list_all("customer").await.unwrap();

        assert_eq!(listed.len(), 3);
        assert_eq!(store.segment_calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let (store, tables) = seeded(10, 0).await;
        let customer = CustomerRecord::new("customer-123", "1", "Ada", "ada@x.com");
        let twin = CustomerRecord::new("customer-123", "1", "Other", "other@x.com");

        tables.insert("customer", &customer).await.unwrap();
        let result = tables.insert("customer", &twin).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows.values().next().unwrap().properties["FirstName"],
            PropertyValue::from("Ada")
        );
    }

    #[tokio::test]
    async fn test_invalid_record_is_rejected_before_store() {
        let (store, tables) = seeded(10, 0).await;
        let result = tables
            .insert("customer", &CustomerRecord::new("", "1", "Ada", "ada@x.com"))
            .await;

        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert!(store.tables.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_table_name_is_rejected() {
        let (_, tables) = seeded(10, 0).await;
        let result = tables.list_all("").await;
        assert_eq!(result, Err(StoreError::InvalidTableName(String::new())));
    }

    #[tokio::test]
    async fn test_operations_create_table_first() {
        let (store, tables) = seeded(10, 0).await;
        tables.list_all("orders").await.unwrap();
        assert!(store.tables.lock().unwrap().contains(&"orders".to_string()));
    }

    #[tokio::test]
    async fn test_filter_by_key_prefix_matches_substring() {
        let store = Arc::new(StubStore::new(2));
        let tables = CustomerTables::new(store.clone());
        for customer in [
            CustomerRecord::new("customer-123", "1", "Ada", "ada@x.com"),
            CustomerRecord::new("lead-7", "2", "Grace", "grace@x.com"),
            CustomerRecord::new("old-customer", "3", "Linus", "linus@x.com"),
        ] {
            tables.insert("customer", &customer).await.unwrap();
        }

        let matched = tables
            .filter_by_key_prefix("customer", "cust", &CancelSignal::never())
            .await
            .unwrap();

        let keys: Vec<&str> = matched.iter().map(|c| c.partition_key.as_str()).collect();
        assert_eq!(keys, vec!["customer-123", "old-customer"]);
        // Filtering reads past the first page.
        assert_eq!(store.segment_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_customer_emails_projects_two_columns() {
        let (store, tables) = seeded(10, 0).await;
        tables
            .insert(
                "customer",
                &CustomerRecord::new("customer-123", "1", "Ada", "ada@x.com"),
            )
            .await
            .unwrap();

        let emails = tables.list_customer_emails("customer").await.unwrap();

        assert_eq!(emails, vec!["Ada,ada@x.com".to_string()]);
        let query = store.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(
            query.columns().unwrap().columns(),
            &["FirstName".to_string(), "Email".to_string()]
        );
    }

    #[tokio::test]
    async fn test_projection_rejects_comma_joined_columns() {
        let (store, tables) = seeded(10, 1).await;

        let result = tables
            .list_projected("customer", &["FirstName, Email"], first_name_and_email)
            .await;

        assert_eq!(
            result,
            Err(StoreError::UnknownColumn("FirstName, Email".to_string()))
        );
        assert_eq!(store.segment_calls(), 0);
    }

    #[tokio::test]
    async fn test_projection_with_custom_resolver() {
        let (_, tables) = seeded(10, 2).await;

        let keys = tables
            .list_projected("customer", &["Email"], |pk, rk, _ts, props| {
                format!("{pk}/{rk}/{}", props.len())
            })
            .await
            .unwrap();

        assert_eq!(keys, vec!["customer-000/000/1", "customer-001/001/1"]);
    }

    #[tokio::test]
    async fn test_mid_sequence_failure_returns_error_not_partial_list() {
        let store = Arc::new(StubStore::new(2).failing_on(1));
        let tables = CustomerTables::new(store.clone());
        for customer in customers(5) {
            tables.insert("customer", &customer).await.unwrap();
        }

        let result = tables
            .list_all_paginated("customer", &CancelSignal::never())
            .await;

        assert!(matches!(result, Err(StoreError::ConnectionFailed(_))));
        assert_eq!(store.segment_calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_filter_returns_cancelled() {
        let (store, tables) = seeded(2, 5).await;
        let (handle, signal) = cancel_pair();
        handle.cancel();

        let result = tables
            .filter_by_key_prefix("customer", "customer", &signal)
            .await;

        assert_eq!(result, Err(StoreError::Cancelled));
        assert_eq!(store.segment_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_listing_returns_cancelled() {
        let (store, tables) = seeded(2, 5).await;
        let (handle, signal) = cancel_pair();
        handle.cancel();

        let result = tables.list_all_paginated("customer", &signal).await;

        assert_eq!(result, Err(StoreError::Cancelled));
        assert_eq!(store.segment_calls(), 0);
    }
}
