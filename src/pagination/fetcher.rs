//! Bounded cursor pagination

use super::types::{FetchState, Page};
use crate::error::Result;
use std::future::Future;
use tracing::debug;

/// Drives repeated page requests into one flat, ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedFetcher {
    page_size: u32,
}

impl Default for PagedFetcher {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagedFetcher {
    /// Items requested per page unless configured otherwise
    pub const DEFAULT_PAGE_SIZE: u32 = 50;

    /// Create a fetcher with the given page size
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// Items requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch pages until the source is exhausted or `limit` items are held
    ///
    /// `fetch_page` receives the cursor (absent for the first page) and the
    /// page size. Returning `Ok(None)` means the connection could not be
    /// reached and ends the run with whatever was gathered. Errors from
    /// `fetch_page` propagate unchanged. No request is issued once the cap
    /// is reached.
    pub async fn fetch_all<T, F, Fut>(&self, limit: Option<usize>, mut fetch_page: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<String>, u32) -> Fut,
        Fut: Future<Output = Result<Option<Page<T>>>>,
    {
        let mut state = FetchState::new();

        while !state.exhausted {
            match fetch_page(state.cursor.clone(), self.page_size).await? {
                Some(page) => {
                    debug!(
                        "Fetched page {} with {} items",
                        state.pages + 1,
                        page.items.len()
                    );
                    state.absorb(page, limit);
                }
                None => {
                    debug!("Connection missing after {} pages, stopping", state.pages);
                    state.finish();
                }
            }
        }

        Ok(state.into_items())
    }
}
