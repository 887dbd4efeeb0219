//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Expo (EAS) connector CLI
#[derive(Parser, Debug)]
#[command(name = "expo-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the access token against the API
    Check,

    /// List resources and their operations
    List,

    /// Run an operation over one or more parameter items
    Run(RunArgs),

    /// Verify a webhook signature
    VerifyWebhook(VerifyArgs),
}

/// Arguments of `run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Resource name (e.g. build, channel)
    #[arg(short, long)]
    pub resource: String,

    /// Operation name (e.g. getMany, linkBranch)
    #[arg(short, long)]
    pub operation: String,

    /// Inline parameters: a JSON object, or an array of objects (one per item)
    #[arg(short, long, conflicts_with = "params_file")]
    pub params: Option<String>,

    /// Parameters file holding the same JSON
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Emit an error record for failed items instead of stopping
    #[arg(long)]
    pub continue_on_fail: bool,
}

/// Arguments of `verify-webhook`
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Webhook secret
    #[arg(long)]
    pub secret: String,

    /// Signature header value (`sha1=<hex>`)
    #[arg(long)]
    pub signature: String,

    /// Raw request body
    #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
    pub payload: Option<String>,

    /// File holding the raw request body
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
