//! # Expo Connector
//!
//! A Rust-native connector for Expo Application Services (EAS): builds,
//! submissions, over-the-air updates, branches, channels, projects,
//! secrets, credentials, webhooks and Apple devices.
//!
//! ## Features
//!
//! - **GraphQL and REST**: One client for both Expo APIs, bearer-token auth
//! - **Bounded Pagination**: Cursor paging with an optional item cap
//! - **Rate-Limit Retries**: Exponential backoff on HTTP 429
//! - **Item Execution**: Run an operation over many parameter items, with
//!   optional continue-on-fail
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use expo_connector::{ExpoClient, ExpoConfig, Executor, Operation, Resource, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ExpoConfig::with_token("expo-token").account_name("acme");
//!     let mut executor = Executor::new(ExpoClient::new(&config)?);
//!
//!     let params = json!({"projectId": "@acme/app", "returnAll": true});
//!     let outputs = executor
//!         .execute(
//!             Resource::Build,
//!             Operation::GetMany,
//!             &[params.as_object().cloned().unwrap_or_default()],
//!             false,
//!         )
//!         .await?;
//!
//!     for output in outputs {
//!         println!("{}", output.json);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Executor (items × operation)                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Resources: build submission update branch channel project      │
//! │             secret credential webhook device                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │  GraphQL  │  Normalize  │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Bearer   │ GraphQL   │ PagedFetcher  │ Queries   │ Platforms   │
//! │ Account  │ REST      │ Connection    │ Mutations │ Signatures  │
//! │ fallback │ Retry     │ paths         │ Envelopes │ Identifiers │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connector configuration
pub mod config;

/// Access-token credentials
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// GraphQL documents and envelopes
pub mod graphql;

/// Cursor pagination
pub mod pagination;

/// Value normalization, identifiers and webhook signatures
pub mod normalize;

/// Expo API client facade
pub mod client;

/// Resource operations
pub mod resources;

/// Item execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ExpoClient;
pub use config::ExpoConfig;
pub use engine::{Executor, ItemOutput, Operation, Resource};
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
