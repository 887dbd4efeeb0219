//! GraphQL request and response envelopes

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Error code used when the API does not report one
const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Status assumed when the API does not report one
const DEFAULT_ERROR_STATUS: u16 = 400;

/// GraphQL request payload
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<'a> {
    /// Query or mutation document
    pub query: &'a str,
    /// Variables (always sent, `{}` when empty)
    pub variables: &'a JsonObject,
}

/// GraphQL response container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    /// Response data
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// GraphQL errors
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Turn the envelope into its data, surfacing the first reported error
    pub fn into_data(self) -> Result<JsonValue> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error.into_error());
        }
        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(Error::NoData),
        }
    }

    /// First reported error of a non-success HTTP response
    ///
    /// An error without its own `statusCode` takes the response status.
    /// `None` when the envelope reports no errors.
    pub fn into_status_error(self, http_status: u16) -> Option<Error> {
        let error = self.errors.into_iter().next()?;
        let status = error.reported_status().unwrap_or(http_status);
        let code = error.code().to_string();
        Some(Error::graphql(error.message, code, status))
    }
}

/// A single GraphQL error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlError {
    /// Error message
    #[serde(default)]
    pub message: String,
    /// Source locations
    #[serde(default)]
    pub locations: Vec<JsonValue>,
    /// Response path
    #[serde(default)]
    pub path: Vec<JsonValue>,
    /// Vendor extensions
    #[serde(default)]
    pub extensions: Option<GraphqlErrorExtensions>,
}

/// Expo error extensions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlErrorExtensions {
    /// Machine-readable error code
    #[serde(default)]
    pub code: Option<String>,
    /// Exception details
    #[serde(default)]
    pub exception: Option<GraphqlErrorException>,
}

/// Exception details attached to an error
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlErrorException {
    /// HTTP status the API associates with the error
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl GraphqlError {
    /// Error code, `UNKNOWN_ERROR` when absent
    pub fn code(&self) -> &str {
        self.extensions
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .unwrap_or(UNKNOWN_ERROR_CODE)
    }

    /// Status code, 400 when absent
    pub fn status_code(&self) -> u16 {
        self.reported_status().unwrap_or(DEFAULT_ERROR_STATUS)
    }

    fn reported_status(&self) -> Option<u16> {
        self.extensions
            .as_ref()
            .and_then(|e| e.exception.as_ref())
            .and_then(|e| e.status_code)
    }

    /// Convert to the crate error type
    pub fn into_error(self) -> Error {
        let code = self.code().to_string();
        let status = self.status_code();
        Error::graphql(self.message, code, status)
    }
}
