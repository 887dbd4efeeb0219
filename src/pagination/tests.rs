//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;

/// Scripted page source that records the cursors it was asked for
struct ScriptedSource {
    pages: Vec<Option<Page<u32>>>,
    requests: Mutex<Vec<(Option<String>, u32)>>,
}

impl ScriptedSource {
    /// Pages of the given sizes, numbered consecutively from 0
    fn with_sizes(sizes: &[u32]) -> Self {
        let mut next = 0;
        let pages = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| {
                let items = (next..next + size).collect();
                next += size;
                let info = if i + 1 < sizes.len() {
                    PageInfo::next(format!("c{}", i + 1))
                } else {
                    PageInfo::last()
                };
                Some(Page::new(items, info))
            })
            .collect();
        Self::new(pages)
    }

    fn new(pages: Vec<Option<Page<u32>>>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    async fn fetch(&self, cursor: Option<String>, size: u32) -> Result<Option<Page<u32>>> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push((cursor, size));
        Ok(self.pages.get(index).cloned().flatten())
    }

    fn cursors(&self) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(cursor, _)| cursor.clone())
            .collect()
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

// ============================================================================
// PageInfo / Connection
// ============================================================================

#[test]
fn test_page_info_lenient() {
    let info: PageInfo = serde_json::from_value(json!({})).unwrap();
    assert_eq!(info, PageInfo::last());

    let info: PageInfo =
        serde_json::from_value(json!({"hasNextPage": true, "endCursor": "abc"})).unwrap();
    assert_eq!(info, PageInfo::next("abc"));
}

#[test]
fn test_connection_into_page() {
    let connection: Connection<Value> = serde_json::from_value(json!({
        "edges": [
            {"node": {"id": "b1"}, "cursor": "x1"},
            {"node": {"id": "b2"}, "cursor": "x2"}
        ],
        "pageInfo": {"hasNextPage": true, "endCursor": "x2"}
    }))
    .unwrap();

    let page: Page<Value> = connection.into();
    assert_eq!(page.items, vec![json!({"id": "b1"}), json!({"id": "b2"})]);
    assert_eq!(page.page_info, PageInfo::next("x2"));
}

#[test]
fn test_connection_missing_parts() {
    let connection: Connection<Value> = serde_json::from_value(json!({})).unwrap();
    let page: Page<Value> = connection.into();
    assert!(page.items.is_empty());
    assert!(!page.page_info.has_next_page);

    let connection: Connection<Value> =
        serde_json::from_value(json!({"edges": null, "pageInfo": null})).unwrap();
    let page: Page<Value> = connection.into();
    assert!(page.items.is_empty());
}

// ============================================================================
// FetchState
// ============================================================================

#[test]
fn test_fetch_state_absorb() {
    let mut state = FetchState::new();
    state.absorb(Page::new(vec![1, 2], PageInfo::next("c1")), None);
    assert_eq!(state.cursor.as_deref(), Some("c1"));
    assert!(!state.exhausted);

    state.absorb(Page::new(vec![3], PageInfo::last()), None);
    assert!(state.exhausted);
    assert_eq!(state.pages, 2);
    assert_eq!(state.into_items(), vec![1, 2, 3]);
}

#[test]
fn test_fetch_state_next_page_without_cursor_stops() {
    let mut state = FetchState::new();
    state.absorb(
        Page::new(
            vec![1],
            PageInfo {
                has_next_page: true,
                end_cursor: None,
            },
        ),
        None,
    );
    assert!(state.exhausted);
}

// ============================================================================
// PagedFetcher
// ============================================================================

#[tokio::test]
async fn test_fetch_all_preserves_order_across_pages() {
    let source = ScriptedSource::with_sizes(&[50, 50, 12]);

    let items = PagedFetcher::default()
        .fetch_all(None, |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(items.len(), 112);
    assert_eq!(items, (0..112).collect::<Vec<_>>());
    assert_eq!(
        source.cursors(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}

#[tokio::test]
async fn test_fetch_all_requests_configured_page_size() {
    let source = ScriptedSource::with_sizes(&[3]);

    PagedFetcher::new(25)
        .fetch_all(None, |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(*source.requests.lock().unwrap(), vec![(None, 25)]);
}

#[tokio::test]
async fn test_fetch_all_cap_stops_early() {
    let source = ScriptedSource::with_sizes(&[50, 50, 50, 50]);

    let items = PagedFetcher::default()
        .fetch_all(Some(60), |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(items, (0..60).collect::<Vec<_>>());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_fetch_all_cap_on_page_boundary() {
    let source = ScriptedSource::with_sizes(&[50, 50, 50]);

    let items = PagedFetcher::default()
        .fetch_all(Some(50), |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(items.len(), 50);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_cap_larger_than_total() {
    let source = ScriptedSource::with_sizes(&[10, 5]);

    let items = PagedFetcher::default()
        .fetch_all(Some(100), |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(items.len(), 15);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_fetch_all_zero_cap_makes_one_call() {
    let source = ScriptedSource::with_sizes(&[5, 5]);

    let items = PagedFetcher::default()
        .fetch_all(Some(0), |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_missing_connection_on_first_call() {
    let source = ScriptedSource::new(vec![None]);

    let items = PagedFetcher::default()
        .fetch_all(None, |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_missing_connection_mid_run_keeps_items() {
    let source = ScriptedSource::new(vec![
        Some(Page::new(vec![1, 2], PageInfo::next("c1"))),
        None,
    ]);

    let items = PagedFetcher::default()
        .fetch_all(None, |cursor, size| source.fetch(cursor, size))
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_fetch_all_propagates_errors() {
    let mut calls = 0;

    let result = PagedFetcher::default()
        .fetch_all::<u32, _, _>(None, |_, _| {
            calls += 1;
            async { Err(Error::http_status(500, "boom")) }
        })
        .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    assert_eq!(calls, 1);
}

// ============================================================================
// ConnectionPath
// ============================================================================

fn builds_response() -> Value {
    json!({
        "app": {
            "byFullName": {
                "builds": {
                    "edges": [{"node": {"id": "b1"}}],
                    "pageInfo": {"hasNextPage": false, "endCursor": null}
                }
            }
        }
    })
}

#[test]
fn test_connection_path_resolves_builds() {
    let page = ConnectionPath::Builds
        .resolve(&builds_response())
        .unwrap()
        .unwrap();
    assert_eq!(page.items, vec![json!({"id": "b1"})]);
    assert_eq!(page.page_info, PageInfo::last());
}

#[test]
fn test_connection_path_missing_segments() {
    assert!(ConnectionPath::Submissions
        .resolve(&builds_response())
        .unwrap()
        .is_none());
    assert!(ConnectionPath::Builds
        .resolve(&json!({"app": {"byFullName": null}}))
        .unwrap()
        .is_none());
    assert!(ConnectionPath::Projects.resolve(&json!({})).unwrap().is_none());
}

#[test]
fn test_connection_path_nested_locations() {
    let data = json!({
        "app": {"byFullName": {"updateBranchByName": {"updates": {"edges": []}}}},
        "account": {"byName": {"apps": {"edges": [{"node": {"id": "p1"}}]}}}
    });

    assert!(ConnectionPath::BranchUpdates.locate(&data).is_some());
    let projects = ConnectionPath::Projects.resolve(&data).unwrap().unwrap();
    assert_eq!(projects.items, vec![json!({"id": "p1"})]);
}

#[test]
fn test_connection_path_malformed_is_error() {
    let data = json!({"app": {"byFullName": {"builds": {"edges": "nope"}}}});
    assert!(matches!(
        ConnectionPath::Builds.resolve(&data),
        Err(Error::JsonParse(_))
    ));
}

#[test]
fn test_simplify_connection() {
    let connection = json!({"edges": [{"node": 1}, {"node": 2}, {}]});
    assert_eq!(
        simplify_connection(&connection),
        vec![json!(1), json!(2), Value::Null]
    );
    assert!(simplify_connection(&Value::Null).is_empty());
    assert!(simplify_connection(&json!({"edges": null})).is_empty());
}
