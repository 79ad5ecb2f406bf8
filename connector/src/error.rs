//! Error taxonomy for connector operations.

use thiserror::Error;

/// Errors surfaced by connector operations.
///
/// Nothing here is retried locally. Validation variants are raised before
/// any request is sent; the remaining variants carry what the backend or the
/// transport reported.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Date range selector outside the known set
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// Missing or malformed platform input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Inbound webhook delivery without its envelope
    #[error("{0}")]
    InvalidWebhook(String),

    /// No resource registered under this key
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Backend answered with a non-2xx status
    #[error("Timesheet API error {status}: {body}")]
    Upstream {
        /// HTTP status code returned by the backend
        status: u16,
        /// Raw response body, verbatim
        body: String,
    },

    /// Access token rejected or refresh failed; the platform must re-authenticate
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Request could not be sent
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ConnectorError {
    /// Returns true when the caller input was rejected before any request went out.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange(_) | Self::InvalidInput(_) | Self::InvalidWebhook(_)
        )
    }

    /// Shorthand for an `InvalidInput` error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result alias used across the connector crate.
pub type Result<T> = std::result::Result<T, ConnectorError>;
