use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::backend::{FeedBackend, FeedError};
use crate::directory::PageDirectory;
use crate::filter::SearchFilter;
use crate::model::{Item, PageInfo};
use crate::resolver::PageResolver;
use crate::settings::FeedSettings;

/// Read-only view of the controller's committed state.
///
/// Snapshots are plain values: clone them freely, read them synchronously.
/// Change notification comes from [`FeedController::subscribe`]; nothing here
/// is bound to any UI technology.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Committed page, `None` until the first successful navigation.
    pub current_page: Option<u32>,
    /// Total pages under the active filter, 0 until the last page resolves.
    pub page_count: u32,
    /// Items of the committed page, in feed order.
    pub items: Arc<Vec<Item>>,
}

impl FeedSnapshot {
    /// Distinct tags across the current items, sorted alphabetically.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for item in self.items.iter() {
            for tag in &item.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        tags.sort();
        tags
    }
}

/// State guarded by the operation lock. One active filter at a time; a new
/// filter throws all of it away.
#[derive(Debug, Default)]
struct Session {
    filter: SearchFilter,
    directory: PageDirectory,
    last_page: Option<PageInfo>,
    current_page: Option<u32>,
    current_items: Arc<Vec<Item>>,
}

impl Session {
    fn page_count(&self) -> u32 {
        self.last_page.map(|p| p.no).unwrap_or(0)
    }

    fn reset(&mut self, filter: SearchFilter) {
        self.filter = filter;
        self.directory.clear();
        self.last_page = None;
        self.current_page = None;
        self.current_items = Arc::new(Vec::new());
    }
}

/// Orchestrates filter changes, page navigation and refresh over a
/// [`FeedBackend`], caching resolved page boundaries so navigation costs at
/// most one resolution round trip.
///
/// Public operations serialize through an internal mutex held across their
/// full network round trip, so at most one resolution/fetch cycle is in
/// flight per controller and callers never interleave writes into the
/// directory or cursor state. Cancellation is not supported: a superseded
/// call runs to completion and commits.
///
/// One controller maps to one active search session. Independent concurrent
/// sessions want independent controller instances, not a shared one.
pub struct FeedController<B> {
    backend: B,
    settings: FeedSettings,
    resolver: PageResolver,
    session: Mutex<Session>,
    state_tx: watch::Sender<FeedSnapshot>,
}

impl<B: FeedBackend> FeedController<B> {
    pub fn new(backend: B, settings: FeedSettings) -> Self {
        let resolver = PageResolver::new(settings.resolve_batch);
        let (state_tx, _) = watch::channel(FeedSnapshot::default());

        Self {
            backend,
            settings,
            resolver,
            session: Mutex::new(Session::default()),
            state_tx,
        }
    }

    /// Current committed state, readable without awaiting.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Receiver that observes every committed state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.state_tx.subscribe()
    }

    /// Active filter.
    pub async fn filter(&self) -> SearchFilter {
        self.session.lock().await.filter.clone()
    }

    /// Replace the active filter, dropping every cached boundary, the last
    /// page and the current items. No I/O happens here; follow up with
    /// [`load_last_page`](Self::load_last_page) or
    /// [`search`](Self::search) to repopulate.
    pub async fn set_filter(&self, filter: SearchFilter) {
        let mut session = self.session.lock().await;
        tracing::debug!(?filter, "Filter changed, dropping page cache");
        session.reset(filter);
        self.publish(&session);
    }

    /// Replace the filter, resolve the new feed's last page and load page 1.
    ///
    /// On a feed with no matching items this commits `page_count = 0` and no
    /// current page.
    pub async fn search(&self, filter: SearchFilter) -> Result<(), FeedError> {
        let mut session = self.session.lock().await;
        session.reset(filter);
        self.publish(&session);

        self.resolve_last_locked(&mut session).await?;
        self.load_page_locked(&mut session, 1, false).await
    }

    /// Navigate to page `no` (clamped into `[1, page_count]`).
    ///
    /// With `page_count == 0` there is no valid page and the call returns
    /// without touching state. Unless `force` is set, navigating to the page
    /// already current is a no-op with no network traffic. State commits only
    /// after both the boundary resolution and the item fetch succeed; on any
    /// failure the previously committed page and items stay in place (though
    /// boundaries merged along the way are kept — they remain valid).
    ///
    /// # Errors
    ///
    /// [`FeedError::PageNotFound`] when the clamped page turns out to lie
    /// beyond the end of the feed (stale `page_count`); transport errors from
    /// the underlying requests otherwise. No automatic retry either way.
    pub async fn load_page(&self, no: u32, force: bool) -> Result<(), FeedError> {
        let mut session = self.session.lock().await;
        self.load_page_locked(&mut session, no, force).await
    }

    /// Resolve the feed's last page, then navigate to it.
    pub async fn load_last_page(&self) -> Result<(), FeedError> {
        let mut session = self.session.lock().await;
        self.resolve_last_locked(&mut session).await?;
        let last = session.page_count();
        self.load_page_locked(&mut session, last, false).await
    }

    /// Drop all cached boundaries and items, re-resolve the last page and
    /// force-reload the current page if there is one.
    ///
    /// This is a best-effort resync: boundaries for pages other than the
    /// current one are re-learned lazily, so a concurrent upstream insert or
    /// delete can leave stale boundaries until they are next resolved.
    pub async fn refresh(&self) -> Result<(), FeedError> {
        let mut session = self.session.lock().await;
        tracing::debug!("Refreshing feed");

        let current = session.current_page;
        session.directory.clear();
        session.last_page = None;
        session.current_items = Arc::new(Vec::new());
        self.publish(&session);

        self.resolve_last_locked(&mut session).await?;
        if let Some(no) = current {
            self.load_page_locked(&mut session, no, true).await?;
        }
        Ok(())
    }

    /// Re-fetch a single item and splice it over the matching entry of the
    /// current page, if present. Returns the fresh item either way.
    ///
    /// # Errors
    ///
    /// [`FeedError::ItemNotFound`] when the item was deleted upstream;
    /// transport errors otherwise. Current items are left untouched on
    /// failure.
    pub async fn reload_item(&self, id: i64) -> Result<Item, FeedError> {
        let mut session = self.session.lock().await;
        let item = self.backend.fetch_item(id).await?;

        if let Some(idx) = session.current_items.iter().position(|i| i.id == id) {
            Arc::make_mut(&mut session.current_items)[idx] = item.clone();
            self.publish(&session);
        }

        Ok(item)
    }

    /// Page numbers for a pagination strip: up to `max + 1` consecutive pages
    /// around the current one, shifted to stay within the feed at the edges.
    pub fn page_window(&self, max: u32) -> Vec<u32> {
        let snapshot = self.state_tx.borrow();
        page_window(snapshot.current_page, snapshot.page_count, max)
    }

    async fn load_page_locked(
        &self,
        session: &mut Session,
        no: u32,
        force: bool,
    ) -> Result<(), FeedError> {
        let page_count = session.page_count();
        if page_count == 0 {
            tracing::debug!("No pages under the active filter, nothing to load");
            return Ok(());
        }

        let no = no.clamp(1, page_count);
        if !force && session.current_page == Some(no) {
            return Ok(());
        }

        let info = self
            .resolver
            .resolve(
                &self.backend,
                &session.filter,
                &mut session.directory,
                no,
                self.settings.page_size,
            )
            .await?;

        let items = self
            .backend
            .fetch_items(&session.filter, info.start_id, self.settings.page_size)
            .await?;

        tracing::debug!(page = no, items = items.len(), "Committing page");
        session.current_page = Some(no);
        session.current_items = Arc::new(items);
        self.publish(session);
        Ok(())
    }

    async fn resolve_last_locked(&self, session: &mut Session) -> Result<(), FeedError> {
        let last = self
            .backend
            .resolve_last_page(&session.filter, self.settings.page_size)
            .await?;

        if let Some(info) = last {
            tracing::debug!(last_page = info.no, "Resolved last page");
            session.directory.put_all([info]);
            session.last_page = Some(info);
        } else {
            tracing::debug!("Feed has no matching items");
            session.last_page = None;
        }
        self.publish(session);
        Ok(())
    }

    fn publish(&self, session: &Session) {
        self.state_tx.send_replace(FeedSnapshot {
            current_page: session.current_page,
            page_count: session.page_count(),
            items: Arc::clone(&session.current_items),
        });
    }
}

/// Window of consecutive page numbers centered on `current`, clamped to
/// `[1, page_count]` and widened toward the opposite edge when the center
/// sits near either end.
fn page_window(current: Option<u32>, page_count: u32, max: u32) -> Vec<u32> {
    if page_count == 0 {
        return Vec::new();
    }

    let half = max / 2;
    let current = current.unwrap_or(1);

    let mut first = current.saturating_sub(half).max(1);
    let mut last = current.saturating_add(half).min(page_count);

    let diff = last - first;
    if diff < max {
        if first == 1 {
            last = last.saturating_add(max - diff).min(page_count);
        } else {
            first = first.saturating_sub(max - diff).max(1);
        }
    }

    (first..=last).collect()
}
