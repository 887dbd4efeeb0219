//! CLI module
//!
//! Command-line interface that plays the host for the connector.
//!
//! # Commands
//!
//! - `check` - Test the access token
//! - `list` - List resources and their operations
//! - `run` - Run an operation over parameter items
//! - `verify-webhook` - Check a webhook signature

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RunArgs, VerifyArgs};
pub use runner::Runner;
