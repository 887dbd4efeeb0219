//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, RunArgs, VerifyArgs};
use crate::client::ExpoClient;
use crate::config::ExpoConfig;
use crate::engine::{Executor, Operation, Resource};
use crate::error::{Error, Result, ResultExt};
use crate::normalize::verify_webhook_signature;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use std::fs;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::List => {
                self.list();
                Ok(())
            }
            Commands::Run(args) => self.run_operation(args).await,
            Commands::VerifyWebhook(args) => self.verify_webhook(args),
        }
    }

    /// Load configuration
    ///
    /// The config file is optional; `EXPO_ACCESS_TOKEN` and
    /// `EXPO_ACCOUNT_NAME` override whatever it sets.
    fn load_config(&self) -> Result<ExpoConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ExpoConfig::from_file(path)?,
            None => ExpoConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn client(&self) -> Result<ExpoClient> {
        ExpoClient::new(&self.load_config()?)
    }

    /// Check the access token
    async fn check(&self) -> Result<()> {
        let client = self.client()?;

        match client.viewer().await {
            Ok(viewer) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": "Connection successful",
                        "viewer": viewer
                    }
                }));
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
            }
        }

        Ok(())
    }

    /// List resources and operations
    fn list(&self) {
        let resources: Vec<JsonValue> = Resource::ALL
            .iter()
            .map(|resource| {
                let operations: Vec<&str> = resource
                    .operations()
                    .iter()
                    .map(|op| op.as_str())
                    .collect();
                json!({ "name": resource.as_str(), "operations": operations })
            })
            .collect();

        self.output_message(&json!({
            "type": "RESOURCES",
            "resources": resources
        }));
    }

    /// Run an operation over the parameter items
    async fn run_operation(&self, args: &RunArgs) -> Result<()> {
        let resource: Resource = args.resource.parse()?;
        let operation = Operation::parse_for(resource, &args.operation)?;

        let raw = match (&args.params, &args.params_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => read_file(path)?,
            (None, None) => "{}".to_string(),
        };
        let items = parse_items(&raw)?;

        let mut executor = Executor::new(self.client()?);
        let outputs = executor
            .execute(resource, operation, &items, args.continue_on_fail)
            .await?;

        for output in &outputs {
            self.output_message(&serde_json::to_value(output)?);
        }

        Ok(())
    }

    /// Verify a webhook signature
    fn verify_webhook(&self, args: &VerifyArgs) -> Result<()> {
        let payload = match (&args.payload, &args.payload_file) {
            (Some(inline), _) => inline.as_bytes().to_vec(),
            (None, Some(path)) => {
                fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?
            }
            (None, None) => return Err(Error::missing_param("payload")),
        };

        let valid = verify_webhook_signature(&payload, &args.signature, &args.secret);

        self.output_message(&json!({
            "type": "WEBHOOK_SIGNATURE",
            "valid": valid
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

/// Parse run parameters into one object per input item
///
/// Accepts a single object or an array of objects.
pub(crate) fn parse_items(raw: &str) -> Result<Vec<JsonObject>> {
    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(item) => Ok(vec![item]),
        JsonValue::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                JsonValue::Object(item) => Ok(item),
                _ => Err(Error::invalid_param(
                    "params",
                    format!("item {index} is not a JSON object"),
                )),
            })
            .collect(),
        _ => Err(Error::invalid_param(
            "params",
            "expected a JSON object or an array of objects",
        )),
    }
}
