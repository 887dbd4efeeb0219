//! Typed accessors for the connections the connector paginates
//!
//! Each list query nests its connection at a fixed position in the
//! response. `ConnectionPath` names those positions; any missing or null
//! segment resolves to `None`.

use super::types::{Connection, Page};
use crate::error::Result;
use crate::types::JsonValue;

/// Location of a paginated connection inside a query response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPath {
    /// `app.byFullName.builds`
    Builds,
    /// `app.byFullName.submissions`
    Submissions,
    /// `app.byFullName.updateBranchByName.updates`
    BranchUpdates,
    /// `app.byFullName.updateBranches`
    Branches,
    /// `app.byFullName.updateChannels`
    Channels,
    /// `account.byName.apps`
    Projects,
    /// `app.byFullName.appleDevices`
    AppleDevices,
}

impl ConnectionPath {
    /// Locate the raw connection object
    pub fn locate(self, data: &JsonValue) -> Option<&JsonValue> {
        let connection = match self {
            Self::Builds => app_by_full_name(data)?.get("builds"),
            Self::Submissions => app_by_full_name(data)?.get("submissions"),
            Self::BranchUpdates => app_by_full_name(data)?
                .get("updateBranchByName")?
                .get("updates"),
            Self::Branches => app_by_full_name(data)?.get("updateBranches"),
            Self::Channels => app_by_full_name(data)?.get("updateChannels"),
            Self::Projects => data.get("account")?.get("byName")?.get("apps"),
            Self::AppleDevices => app_by_full_name(data)?.get("appleDevices"),
        }?;

        (!connection.is_null()).then_some(connection)
    }

    /// Resolve the connection into a page
    ///
    /// `Ok(None)` when the connection is absent. A present but malformed
    /// connection is a parse error.
    pub fn resolve(self, data: &JsonValue) -> Result<Option<Page<JsonValue>>> {
        match self.locate(data) {
            Some(connection) => {
                let connection: Connection<JsonValue> =
                    serde_json::from_value(connection.clone())?;
                Ok(Some(connection.into()))
            }
            None => Ok(None),
        }
    }
}

fn app_by_full_name(data: &JsonValue) -> Option<&JsonValue> {
    data.get("app")?.get("byFullName")
}

/// Flatten `edges[].node` of a connection, empty when absent
pub fn simplify_connection(connection: &JsonValue) -> Vec<JsonValue> {
    connection
        .get("edges")
        .and_then(JsonValue::as_array)
        .map(|edges| {
            edges
                .iter()
                .map(|edge| edge.get("node").cloned().unwrap_or(JsonValue::Null))
                .collect()
        })
        .unwrap_or_default()
}
