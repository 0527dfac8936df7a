use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::{FeedBackend, FeedError};
use crate::filter::SearchFilter;
use crate::model::{Item, PageInfo};
use crate::settings::FeedSettings;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces the bearer token attached to every request.
///
/// Consulted per request rather than captured once, so callers can rotate
/// credentials (token refresh, login/logout) without rebuilding the backend.
#[async_trait]
pub trait AuthTokenSource: Send + Sync {
    /// Current token, or `None` for anonymous access.
    async fn token(&self) -> Option<String>;
}

/// Token source for anonymous access.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl AuthTokenSource for NoAuth {
    async fn token(&self) -> Option<String> {
        None
    }
}

/// [`FeedBackend`] speaking the booru-style REST protocol.
///
/// Endpoints, relative to the base URL:
/// - `GET /api/post/pages?t=&e=&ppp=&pc=&opno=&opsid=` — boundary resolution
/// - `GET /api/post/pages/last?t=&e=&ppp=` — last-page resolution
/// - `GET /api/post?t=&e=&sid=&limit=` — item fetch
/// - `GET /api/post/{id}` — single item
///
/// Tag filters travel as comma-joined `t`/`e` parameters, omitted when empty.
/// Backward resolution is expressed with a negative `pc`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    auth: Arc<dyn AuthTokenSource>,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: Url, auth: Arc<dyn AuthTokenSource>) -> Self {
        Self {
            client,
            base_url,
            auth,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a backend whose request deadline comes from
    /// [`FeedSettings::request_timeout_secs`] instead of the default.
    pub fn from_settings(
        client: reqwest::Client,
        base_url: Url,
        auth: Arc<dyn AuthTokenSource>,
        settings: &FeedSettings,
    ) -> Self {
        Self::new(client, base_url, auth)
            .with_timeout(Duration::from_secs(settings.request_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        // Url::join only fails on degenerate bases (cannot-be-a-base URLs);
        // surface it as a 400-class status rather than panicking.
        self.base_url
            .join(path)
            .map_err(|_| FeedError::HttpStatus(400))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FeedError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.get(url).query(query);

        if let Some(token) = self.auth.token().await {
            request = request.bearer_auth(token);
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| FeedError::Timeout)?
            .map_err(FeedError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = path, status = %status, "Backend returned error status");
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        response.json::<T>().await.map_err(FeedError::Network)
    }
}

fn filter_params(filter: &SearchFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(t) = filter.include_param() {
        params.push(("t", t));
    }
    if let Some(e) = filter.exclude_param() {
        params.push(("e", e));
    }
    params
}

#[async_trait]
impl FeedBackend for HttpBackend {
    async fn resolve_pages(
        &self,
        filter: &SearchFilter,
        origin: Option<&PageInfo>,
        count: i32,
        page_size: u32,
    ) -> Result<Vec<PageInfo>, FeedError> {
        let mut params = filter_params(filter);
        params.push(("ppp", page_size.to_string()));
        params.push(("pc", count.to_string()));
        if let Some(origin) = origin {
            params.push(("opno", origin.no.to_string()));
            params.push(("opsid", origin.start_id.to_string()));
        }

        tracing::debug!(
            origin = origin.map(|p| p.no),
            count = count,
            "Requesting page resolution"
        );

        self.get_json("api/post/pages", &params).await
    }

    async fn resolve_last_page(
        &self,
        filter: &SearchFilter,
        page_size: u32,
    ) -> Result<Option<PageInfo>, FeedError> {
        let mut params = filter_params(filter);
        params.push(("ppp", page_size.to_string()));

        // The endpoint answers `null` when nothing matches the filter.
        self.get_json("api/post/pages/last", &params).await
    }

    async fn fetch_items(
        &self,
        filter: &SearchFilter,
        start_id: i64,
        page_size: u32,
    ) -> Result<Vec<Item>, FeedError> {
        let mut params = filter_params(filter);
        params.push(("sid", start_id.to_string()));
        params.push(("limit", page_size.to_string()));

        self.get_json("api/post", &params).await
    }

    async fn fetch_item(&self, id: i64) -> Result<Item, FeedError> {
        // 404 here means the item was deleted upstream, not a backend fault
        match self.get_json(&format!("api/post/{id}"), &[]).await {
            Err(FeedError::HttpStatus(404)) => Err(FeedError::ItemNotFound(id)),
            other => other,
        }
    }
}
