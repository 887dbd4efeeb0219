//! Engine types
//!
//! Resource and operation names, and the items an execution produces.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An Expo resource the connector can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Build,
    Submission,
    Update,
    Branch,
    Channel,
    Project,
    Secret,
    Credential,
    Webhook,
    Device,
}

impl Resource {
    /// Every resource, in display order
    pub const ALL: &'static [Resource] = &[
        Resource::Build,
        Resource::Submission,
        Resource::Update,
        Resource::Branch,
        Resource::Channel,
        Resource::Project,
        Resource::Secret,
        Resource::Credential,
        Resource::Webhook,
        Resource::Device,
    ];

    /// Name used in parameters and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Build => "build",
            Resource::Submission => "submission",
            Resource::Update => "update",
            Resource::Branch => "branch",
            Resource::Channel => "channel",
            Resource::Project => "project",
            Resource::Secret => "secret",
            Resource::Credential => "credential",
            Resource::Webhook => "webhook",
            Resource::Device => "device",
        }
    }

    /// Operations this resource supports
    pub fn operations(self) -> &'static [Operation] {
        use Operation::*;

        match self {
            Resource::Build => &[
                Create,
                Get,
                GetMany,
                Cancel,
                Retry,
                Delete,
                GetArtifacts,
                GetLogs,
            ],
            Resource::Submission => &[Create, Get, GetMany, Cancel, Retry, GetStatus],
            Resource::Update => &[
                Publish,
                Get,
                GetMany,
                Rollback,
                Delete,
                Republish,
                GetManifest,
            ],
            Resource::Branch => &[Create, Get, GetMany, Update, Delete, GetUpdates, Publish],
            Resource::Channel => &[
                Create,
                Get,
                GetMany,
                Update,
                Delete,
                LinkBranch,
                UnlinkBranch,
                GetLinkedBranch,
            ],
            Resource::Project => &[
                Get,
                GetMany,
                Create,
                Update,
                Delete,
                GetBuilds,
                GetSubmissions,
                GetUpdates,
                Transfer,
            ],
            Resource::Secret => &[
                Create,
                Get,
                GetMany,
                Update,
                Delete,
                CreateBuildSecret,
                CreateUpdateSecret,
            ],
            Resource::Credential => &[
                GetMany,
                GetIosDistribution,
                GetIosPush,
                GetAndroidKeystore,
                GetAndroidFcm,
                CreateIosDistribution,
                CreateAndroidKeystore,
                Delete,
                DownloadKeystore,
            ],
            Resource::Webhook => &[
                Create,
                Get,
                GetMany,
                Update,
                Delete,
                GetDeliveries,
                RedeliverEvent,
            ],
            Resource::Device => &[Register, Get, GetMany, Delete, CreateProvisioningProfile],
        }
    }

    /// Check whether an operation belongs to this resource
    pub fn supports(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Fail with `UnknownOperation` unless the operation is supported
    pub fn ensure_supports(self, operation: Operation) -> Result<()> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(Error::UnknownOperation {
                resource: self.as_str().to_string(),
                operation: operation.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownResource {
                resource: s.to_string(),
            })
    }
}

/// An operation name, shared across resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    GetMany,
    Update,
    Delete,
    Cancel,
    Retry,
    GetArtifacts,
    GetLogs,
    GetStatus,
    Publish,
    Rollback,
    Republish,
    GetManifest,
    GetUpdates,
    LinkBranch,
    UnlinkBranch,
    GetLinkedBranch,
    GetBuilds,
    GetSubmissions,
    Transfer,
    CreateBuildSecret,
    CreateUpdateSecret,
    GetIosDistribution,
    GetIosPush,
    GetAndroidKeystore,
    GetAndroidFcm,
    CreateIosDistribution,
    CreateAndroidKeystore,
    DownloadKeystore,
    GetDeliveries,
    RedeliverEvent,
    Register,
    CreateProvisioningProfile,
}

impl Operation {
    /// Every operation name
    pub const ALL: &'static [Operation] = &[
        Operation::Create,
        Operation::Get,
        Operation::GetMany,
        Operation::Update,
        Operation::Delete,
        Operation::Cancel,
        Operation::Retry,
        Operation::GetArtifacts,
        Operation::GetLogs,
        Operation::GetStatus,
        Operation::Publish,
        Operation::Rollback,
        Operation::Republish,
        Operation::GetManifest,
        Operation::GetUpdates,
        Operation::LinkBranch,
        Operation::UnlinkBranch,
        Operation::GetLinkedBranch,
        Operation::GetBuilds,
        Operation::GetSubmissions,
        Operation::Transfer,
        Operation::CreateBuildSecret,
        Operation::CreateUpdateSecret,
        Operation::GetIosDistribution,
        Operation::GetIosPush,
        Operation::GetAndroidKeystore,
        Operation::GetAndroidFcm,
        Operation::CreateIosDistribution,
        Operation::CreateAndroidKeystore,
        Operation::DownloadKeystore,
        Operation::GetDeliveries,
        Operation::RedeliverEvent,
        Operation::Register,
        Operation::CreateProvisioningProfile,
    ];

    /// camelCase name
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::GetMany => "getMany",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Cancel => "cancel",
            Operation::Retry => "retry",
            Operation::GetArtifacts => "getArtifacts",
            Operation::GetLogs => "getLogs",
            Operation::GetStatus => "getStatus",
            Operation::Publish => "publish",
            Operation::Rollback => "rollback",
            Operation::Republish => "republish",
            Operation::GetManifest => "getManifest",
            Operation::GetUpdates => "getUpdates",
            Operation::LinkBranch => "linkBranch",
            Operation::UnlinkBranch => "unlinkBranch",
            Operation::GetLinkedBranch => "getLinkedBranch",
            Operation::GetBuilds => "getBuilds",
            Operation::GetSubmissions => "getSubmissions",
            Operation::Transfer => "transfer",
            Operation::CreateBuildSecret => "createBuildSecret",
            Operation::CreateUpdateSecret => "createUpdateSecret",
            Operation::GetIosDistribution => "getIosDistribution",
            Operation::GetIosPush => "getIosPush",
            Operation::GetAndroidKeystore => "getAndroidKeystore",
            Operation::GetAndroidFcm => "getAndroidFcm",
            Operation::CreateIosDistribution => "createIosDistribution",
            Operation::CreateAndroidKeystore => "createAndroidKeystore",
            Operation::DownloadKeystore => "downloadKeystore",
            Operation::GetDeliveries => "getDeliveries",
            Operation::RedeliverEvent => "redeliverEvent",
            Operation::Register => "register",
            Operation::CreateProvisioningProfile => "createProvisioningProfile",
        }
    }

    /// Parse an operation name in the context of a resource
    pub fn parse_for(resource: Resource, name: &str) -> Result<Self> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == name)
            .filter(|op| resource.supports(*op))
            .ok_or_else(|| Error::UnknownOperation {
                resource: resource.as_str().to_string(),
                operation: name.to_string(),
            })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output item, tagged with the input item that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    /// Index of the input item
    pub item: usize,
    pub json: JsonValue,
}

impl ItemOutput {
    /// Create an output item
    pub fn new(item: usize, json: JsonValue) -> Self {
        Self { item, json }
    }

    /// Error record emitted in place of a failed item
    pub fn error(item: usize, error: &Error) -> Self {
        Self {
            item,
            json: serde_json::json!({ "error": error.to_string() }),
        }
    }

    /// Check if this item records a failure
    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some()
    }
}

/// Counters for one executor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    /// Input items processed
    pub items_processed: usize,
    /// Output items produced, error records included
    pub outputs: usize,
    /// Items that failed
    pub errors: usize,
    /// Duration of the last run in milliseconds
    pub duration_ms: u64,
}

impl ExecutionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed item and its outputs
    pub fn add_item(&mut self, outputs: usize) {
        self.items_processed += 1;
        self.outputs += outputs;
    }

    /// Record a failed item
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
