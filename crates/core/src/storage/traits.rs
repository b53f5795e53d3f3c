use async_trait::async_trait;

use super::{ContinuationToken, Page, Result, TableQuery, TableRow};

/// Client capability over a remote table store.
///
/// Implementations hold no per-call state; every method can be called
/// concurrently from independent requests.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Creates the named table if it does not exist yet. Idempotent.
    async fn ensure_table(&self, table: &str) -> Result<()>;

    /// Executes one bounded segment of `query`, resuming after `token`.
    ///
    /// The returned page carries the cursor for the next segment, or `None`
    /// when the table has been read to the end.
    async fn query_segment(
        &self,
        table: &str,
        query: &TableQuery,
        token: Option<ContinuationToken>,
    ) -> Result<Page<TableRow>>;

    /// Inserts a single row. Fails with `AlreadyExists` if a row with the same
    /// `(partition_key, row_key)` is already stored.
    ///
    /// The store assigns the row's timestamp and etag.
    async fn insert(&self, table: &str, row: TableRow) -> Result<()>;
}
