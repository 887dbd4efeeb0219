//! Cursor connection types
//!
//! Mirrors the GraphQL connection shape: `edges[].node` plus `pageInfo`.
//! Deserialization is lenient; absent or null fields fall back to their
//! defaults.

use serde::{Deserialize, Serialize};

/// Cursor position reported with every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    /// Whether another page follows this one
    pub has_next_page: bool,
    /// Cursor to request the next page with
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Page info for the final page
    pub fn last() -> Self {
        Self::default()
    }

    /// Page info pointing at a following page
    pub fn next(cursor: impl Into<String>) -> Self {
        Self {
            has_next_page: true,
            end_cursor: Some(cursor.into()),
        }
    }
}

/// A single edge of a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    #[serde(default)]
    pub node: T,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A GraphQL connection as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Option<Vec<Edge<T>>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

/// One fetched page of items
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(connection: Connection<T>) -> Self {
        Self {
            items: connection
                .edges
                .unwrap_or_default()
                .into_iter()
                .map(|edge| edge.node)
                .collect(),
            page_info: connection.page_info.unwrap_or_default(),
        }
    }
}

/// Progress of a single pagination run
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    /// Cursor for the next request
    pub cursor: Option<String>,
    /// Items gathered so far, in arrival order
    pub accumulated: Vec<T>,
    /// No further pages will be requested
    pub exhausted: bool,
    /// Pages consumed
    pub pages: usize,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            cursor: None,
            accumulated: Vec::new(),
            exhausted: false,
            pages: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// Create a fresh state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a page into the state, honouring an optional item cap
    pub fn absorb(&mut self, page: Page<T>, limit: Option<usize>) {
        self.pages += 1;
        self.accumulated.extend(page.items);

        if let Some(limit) = limit {
            if self.accumulated.len() >= limit {
                self.accumulated.truncate(limit);
                self.exhausted = true;
                return;
            }
        }

        self.cursor = page.page_info.end_cursor;
        // A next page without a cursor would re-request the first page.
        self.exhausted = !page.page_info.has_next_page || self.cursor.is_none();
    }

    /// Mark the run finished without consuming another page
    pub fn finish(&mut self) {
        self.exhausted = true;
    }

    /// Consume the state, returning the gathered items
    pub fn into_items(self) -> Vec<T> {
        self.accumulated
    }
}
