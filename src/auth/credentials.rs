//! Expo API credentials

use crate::config::ExpoConfig;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;

/// Access token plus optional default account
#[derive(Clone)]
pub struct Credentials {
    access_token: String,
    account_name: Option<String>,
}

impl Credentials {
    /// Create credentials from an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            account_name: None,
        }
    }

    /// Set the default account name
    #[must_use]
    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        let name = account_name.into();
        self.account_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Build credentials from connector configuration
    pub fn from_config(config: &ExpoConfig) -> Self {
        Self {
            access_token: config.access_token.clone(),
            account_name: config.account_name.clone().filter(|a| !a.is_empty()),
        }
    }

    /// The raw access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The default account name, if configured
    pub fn default_account(&self) -> Option<&str> {
        self.account_name.as_deref()
    }

    /// Apply the bearer header to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.access_token)
    }

    /// Pick the account for an account-scoped operation
    ///
    /// A non-empty explicit name wins over the configured default.
    pub fn resolve_account(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .filter(|name| !name.is_empty())
            .or(self.default_account())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::config(
                    "Account name is required. Provide it in the parameters or in the credentials.",
                )
            })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"***")
            .field("account_name", &self.account_name)
            .finish()
    }
}
