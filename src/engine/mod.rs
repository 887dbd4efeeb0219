//! Execution engine module
//!
//! Runs one resource operation over a list of input items.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Executor` - Runs an operation per item, in order, one at a time
//! - `Resource` / `Operation` - Names the host passes in
//! - `ItemOutput` - Output records paired with their input item

mod types;

pub use types::{ExecutionStats, ItemOutput, Operation, Resource};

use crate::client::ExpoClient;
use crate::error::Result;
use crate::resources;
use crate::types::JsonObject;
use std::time::Instant;
use tracing::{info, warn};

/// Executor for resource operations
#[derive(Debug)]
pub struct Executor {
    /// Expo API client
    client: ExpoClient,
    /// Statistics
    stats: ExecutionStats,
}

impl Executor {
    /// Create a new executor
    pub fn new(client: ExpoClient) -> Self {
        Self {
            client,
            stats: ExecutionStats::default(),
        }
    }

    /// Get the client
    pub fn client(&self) -> &ExpoClient {
        &self.client
    }

    /// Get statistics
    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    /// Run an operation once per input item
    ///
    /// Items run serially and output keeps input order. A failing item
    /// aborts the run unless `continue_on_fail` is set, in which case it
    /// yields an `{"error": ...}` record and the run goes on.
    pub async fn execute(
        &mut self,
        resource: Resource,
        operation: Operation,
        items: &[JsonObject],
        continue_on_fail: bool,
    ) -> Result<Vec<ItemOutput>> {
        resource.ensure_supports(operation)?;

        let start = Instant::now();
        let mut outputs = Vec::new();

        for (index, params) in items.iter().enumerate() {
            match resources::execute(&self.client, resource, operation, params).await {
                Ok(records) => {
                    self.stats.add_item(records.len());
                    outputs.extend(records.into_iter().map(|json| ItemOutput::new(index, json)));
                }
                Err(e) if continue_on_fail => {
                    warn!("{resource}.{operation} failed for item {index}: {e}");
                    self.stats.add_item(1);
                    self.stats.add_error();
                    outputs.push(ItemOutput::error(index, &e));
                }
                Err(e) => {
                    self.stats.add_error();
                    self.stats.set_duration(start.elapsed().as_millis() as u64);
                    return Err(e);
                }
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "{resource}.{operation}: {} items, {} outputs in {}ms",
            items.len(),
            outputs.len(),
            self.stats.duration_ms
        );

        Ok(outputs)
    }
}
