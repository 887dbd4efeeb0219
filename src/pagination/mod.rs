//! Pagination module
//!
//! Cursor-based pagination over GraphQL connections.
//!
//! # Overview
//!
//! `PagedFetcher` requests pages one at a time, appends their nodes in
//! arrival order and stops when the server reports no next page, when the
//! connection disappears from the response, or when an optional item cap is
//! reached. `ConnectionPath` locates each list query's connection inside
//! the response data.

mod fetcher;
mod path;
mod types;

pub use fetcher::PagedFetcher;
pub use path::{simplify_connection, ConnectionPath};
pub use types::{Connection, Edge, FetchState, Page, PageInfo};

#[cfg(test)]
mod tests;
