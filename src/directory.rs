use std::collections::BTreeMap;

use crate::model::PageInfo;

/// Incrementally built mapping from page number to resolved boundary.
///
/// The directory may have gaps — only pages touched by a resolution response
/// are present. Entries are never mutated in place: a later `put_all` for the
/// same page number replaces the old entry wholesale, and filter changes or
/// refreshes drop the whole map at once. The map is ordered so nearest/next/
/// prev lookups are deterministic.
///
/// This type performs no I/O; all network traffic lives in the resolver.
#[derive(Debug, Default, Clone)]
pub struct PageDirectory {
    pages: BTreeMap<u32, PageInfo>,
}

impl PageDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, no: u32) -> Option<&PageInfo> {
        self.pages.get(&no)
    }

    /// Merge resolved boundaries into the directory. Last write wins when the
    /// same page number appears more than once.
    pub fn put_all<I>(&mut self, pages: I)
    where
        I: IntoIterator<Item = PageInfo>,
    {
        for page in pages {
            self.pages.insert(page.no, page);
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Known page nearest to `no` by absolute distance. Ties break toward the
    /// lower page number so resolution planning is reproducible.
    pub fn nearest(&self, no: u32) -> Option<&PageInfo> {
        self.pages
            .values()
            .min_by_key(|page| (no.abs_diff(page.no), page.no))
    }

    /// Smallest known page strictly greater than `no`.
    pub fn next_after(&self, no: u32) -> Option<&PageInfo> {
        self.pages
            .range(no.checked_add(1)?..)
            .next()
            .map(|(_, page)| page)
    }

    /// Largest known page strictly less than `no`.
    pub fn prev_before(&self, no: u32) -> Option<&PageInfo> {
        self.pages.range(..no).next_back().map(|(_, page)| page)
    }
}
