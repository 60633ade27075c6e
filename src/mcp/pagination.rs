//! Cursor-following list fetches.

use serde_json::{Map, Value};
use std::future::Future;

use super::decoder::Decoder;
use super::options::{adapt, RequestOptions};
use super::session::McpSession;
use super::types::Paginated;
use crate::error::{McpError, Result};

pub const DEFAULT_MAX_PAGES: usize = 1000;

/// The method and base params of one paginated listing.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub method: &'a str,
    pub params: &'a Map<String, Value>,
    pub max_pages: Option<usize>,
}

/// Drive `fetch` page by page until the cursor runs out.
///
/// Each call to `fetch` gets its own copy of `base_params`, with `cursor`
/// set when the previous page returned one. Pages are fetched one at a time
/// and their items are appended in order. The first error is returned as-is
/// and whatever was collected so far is dropped.
///
/// With `max_pages` set, a cursor that is still present after that many
/// pages fails with [`McpError::PaginationLimit`]. `Some(0)` means no limit,
/// the same as `None`.
pub async fn paginate<P, T, F, Fut, X>(
    method: &str,
    base_params: &Map<String, Value>,
    max_pages: Option<usize>,
    mut fetch: F,
    mut extract: X,
) -> Result<Vec<T>>
where
    P: Paginated,
    F: FnMut(Map<String, Value>) -> Fut,
    Fut: Future<Output = Result<P>>,
    X: FnMut(P) -> Vec<T>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;
    let max_pages = max_pages.filter(|limit| *limit > 0);

    loop {
        let mut params = base_params.clone();
        if let Some(c) = cursor.take() {
            params.insert("cursor".to_string(), Value::String(c));
        }

        let page = fetch(params).await?;
        pages += 1;

        cursor = page
            .next_cursor()
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let page_items = extract(page);
        tracing::trace!(
            method,
            page = pages,
            items = page_items.len(),
            has_more = cursor.is_some(),
            "fetched page"
        );
        items.extend(page_items);

        if cursor.is_none() {
            return Ok(items);
        }

        if let Some(limit) = max_pages {
            if pages >= limit {
                return Err(McpError::PaginationLimit {
                    method: method.to_string(),
                    max_pages: limit,
                });
            }
        }
    }
}

/// Collect every item of a paginated listing through `session`.
///
/// The same options are forwarded with each page, so a timeout applies per
/// page rather than to the whole listing.
pub async fn fetch_all_pages<S, D, T, X>(
    session: &S,
    request: PageRequest<'_>,
    decoder: &D,
    extract: X,
    options: Option<&RequestOptions>,
) -> Result<Vec<T>>
where
    S: McpSession + ?Sized,
    D: Decoder,
    D::Output: Paginated,
    X: FnMut(D::Output) -> Vec<T>,
{
    let method = request.method;
    paginate(
        method,
        request.params,
        request.max_pages,
        |params| async move {
            let raw = session
                .request(method, Some(Value::Object(params)), adapt(options))
                .await?;
            decoder.decode(raw)
        },
        extract,
    )
    .await
}
