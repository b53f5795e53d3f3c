//! Paginated fetch-all over a continuation-token API.

use std::future::Future;

use super::{CancelSignal, ContinuationToken, Page, Result, StoreError};

/// Fetches every page of a paginated listing and concatenates the items.
///
/// `fetch_page` is called with `None` first, then with each continuation
/// token the previous page returned, until a page comes back without one.
/// Pages are fetched one at a time in arrival order.
///
/// Any fetch error aborts the whole accumulation. If `cancel` fires, the
/// in-flight fetch is dropped and [`StoreError::Cancelled`] is returned. No
/// partial list is ever returned.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F, cancel: &CancelSignal) -> Result<Vec<T>>
where
    F: FnMut(Option<ContinuationToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<ContinuationToken> = None;
    let mut pages = 0usize;

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(pages, "Pagination cancelled before fetch");
            return Err(StoreError::Cancelled);
        }

        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(pages, "Pagination cancelled during fetch");
                return Err(StoreError::Cancelled);
            }
            page = fetch_page(token.take()) => page?,
        };

        pages += 1;
        tracing::trace!(page = pages, rows = page.items.len(), "Fetched page");
        items.extend(page.items);

        match page.continuation {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    tracing::debug!(pages, rows = items.len(), "Fetched all pages");
    Ok(items)
}
