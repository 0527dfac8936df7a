use crate::backend::{FeedBackend, FeedError};
use crate::directory::PageDirectory;
use crate::filter::SearchFilter;
use crate::model::PageInfo;

/// How to answer "what cursor does page `no` start at?".
///
/// Computed purely from the directory — no I/O — so planning is unit
/// testable and reproducible. Only `Hit` avoids a round trip; the other
/// variants each describe exactly one resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Boundary already known.
    Hit(PageInfo),
    /// Empty directory: resolve `count` pages forward from the feed start.
    FromStart { count: u32 },
    /// Resolve `count` pages forward from a known origin below the target.
    Forward { origin: PageInfo, count: u32 },
    /// Resolve `count` pages backward from a known origin above the target.
    Backward { origin: PageInfo, count: u32 },
}

/// Plans and executes page-boundary resolution, expanding the directory
/// outward from the nearest known page to keep requests small.
///
/// Boundary resolution is the expensive backend call; the whole point of
/// this type is to issue at most one per navigation and none at all when the
/// directory already knows the answer.
#[derive(Debug, Clone, Copy)]
pub struct PageResolver {
    batch: u32,
}

impl PageResolver {
    /// `batch` bounds how far a single request expands past the target page.
    pub fn new(batch: u32) -> Self {
        Self {
            batch: batch.max(1),
        }
    }

    /// Decide what request (if any) is needed to learn page `no`'s boundary.
    ///
    /// The nearest known page (ties to the lower number) becomes the origin.
    /// The request is stretched to the next known boundary on the far side of
    /// the target when that lies within `batch` of the origin, so adjacent
    /// resolved regions knit together; otherwise it runs `batch` pages past
    /// the origin. Either way the range is clamped to reach the target and to
    /// overshoot it by at most `batch`.
    pub fn plan(&self, directory: &PageDirectory, no: u32) -> ResolutionPlan {
        if let Some(info) = directory.get(no) {
            return ResolutionPlan::Hit(*info);
        }

        let Some(nearest) = directory.nearest(no).copied() else {
            return ResolutionPlan::FromStart {
                count: no.saturating_add(self.batch),
            };
        };

        if nearest.no < no {
            let raw_end = match directory.next_after(no) {
                Some(next) if next.no - nearest.no < self.batch => next.no,
                _ => nearest.no.saturating_add(self.batch),
            };
            let target_end = raw_end.clamp(no, no.saturating_add(self.batch));

            ResolutionPlan::Forward {
                origin: nearest,
                count: target_end - nearest.no,
            }
        } else {
            // nearest.no == no would have been a hit
            let raw_start = match directory.prev_before(no) {
                Some(prev) if nearest.no - prev.no < self.batch => prev.no,
                _ => nearest.no.saturating_sub(self.batch).max(1),
            };
            let target_start = raw_start.clamp(no.saturating_sub(self.batch).max(1), no);

            ResolutionPlan::Backward {
                origin: nearest,
                count: nearest.no - target_start,
            }
        }
    }

    /// Resolve page `no`'s boundary, issuing at most one backend round trip
    /// and merging whatever it returns into the directory.
    ///
    /// # Errors
    ///
    /// [`FeedError::PageNotFound`] when the directory still lacks `no` after
    /// a successful round trip — the feed is shorter than `no`. Transport
    /// errors pass through unchanged; boundaries merged before the lookup
    /// are kept either way, since known boundaries stay valid.
    pub async fn resolve<B>(
        &self,
        backend: &B,
        filter: &SearchFilter,
        directory: &mut PageDirectory,
        no: u32,
        page_size: u32,
    ) -> Result<PageInfo, FeedError>
    where
        B: FeedBackend + ?Sized,
    {
        let (origin, count) = match self.plan(directory, no) {
            ResolutionPlan::Hit(info) => {
                tracing::debug!(page = no, "Boundary already resolved");
                return Ok(info);
            }
            ResolutionPlan::FromStart { count } => (None, count as i32),
            ResolutionPlan::Forward { origin, count } => (Some(origin), count as i32),
            ResolutionPlan::Backward { origin, count } => (Some(origin), -(count as i32)),
        };

        tracing::debug!(
            page = no,
            origin = origin.map(|p| p.no),
            count = count,
            "Resolving page boundaries"
        );

        let pages = backend
            .resolve_pages(filter, origin.as_ref(), count, page_size)
            .await?;
        directory.put_all(pages);

        directory.get(no).copied().ok_or_else(|| {
            tracing::debug!(page = no, "Page beyond end of feed");
            FeedError::PageNotFound(no)
        })
    }
}
