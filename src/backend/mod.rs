mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::filter::SearchFilter;
use crate::model::{Item, PageInfo};

pub use http::{AuthTokenSource, HttpBackend, NoAuth};

/// Errors surfaced by backend operations and the controller built on them.
///
/// `PageNotFound` and `ItemNotFound` are the non-transport kinds: the round
/// trip completed but the requested page lies beyond the end of the feed, or
/// the item is gone upstream. Callers must be able to tell them apart from
/// transport failure — retrying a not-found identically is pointless.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Page number exceeds the resolvable range for the active filter.
    #[error("page {0} is beyond the end of the feed")]
    PageNotFound(u32),
    /// The single-item endpoint answered 404: the item no longer exists.
    #[error("item {0} not found")]
    ItemNotFound(i64),
    /// Transport-level error (DNS, connection, TLS, body decode).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured deadline.
    #[error("request timed out")]
    Timeout,
}

/// The remote feed's query surface, as consumed by the resolver and
/// controller.
///
/// Resolution responses are origin-inclusive: a forward `count` from origin
/// `p` may cover pages `p.no ..= p.no + count`, a backward one
/// `p.no - |count| ..= p.no`. Near the feed edges fewer pages come back; an
/// empty response is normal, not an error.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// Expand known page boundaries outward from `origin`.
    ///
    /// Negative `count` resolves backward from the origin; an absent origin
    /// resolves forward from the start of the feed.
    async fn resolve_pages(
        &self,
        filter: &SearchFilter,
        origin: Option<&PageInfo>,
        count: i32,
        page_size: u32,
    ) -> Result<Vec<PageInfo>, FeedError>;

    /// Resolve the boundary of the feed's final page under `filter`.
    /// `None` means no item matches the filter at all.
    async fn resolve_last_page(
        &self,
        filter: &SearchFilter,
        page_size: u32,
    ) -> Result<Option<PageInfo>, FeedError>;

    /// Fetch the items of the page starting at `start_id`, in feed order.
    async fn fetch_items(
        &self,
        filter: &SearchFilter,
        start_id: i64,
        page_size: u32,
    ) -> Result<Vec<Item>, FeedError>;

    /// Fetch a single item by id.
    async fn fetch_item(&self, id: i64) -> Result<Item, FeedError>;
}
