//! # Checkout Error Types
//!
//! Typed error handling for the checkout handler.
//! Every checkout operation returns `Result<T, CheckoutError>`.

use std::fmt;
use thiserror::Error;

/// Structured failure reported by the payment provider.
///
/// Carries whatever the provider told us: the human-readable message,
/// its error `type` and `code`, and the HTTP status of the response.
/// Transport failures have no `http_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub http_status: Option<u16>,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
            error_type: None,
            code: None,
            http_status: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.provider, self.message)
    }
}

/// Core error type for the checkout flow
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request used a method other than POST
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Cart is missing, empty, or has an invalid item
    #[error("{0}")]
    Validation(String),

    /// Missing or malformed server credential / settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider rejected the request or could not be reached
    #[error("Provider error {0}")]
    Provider(ProviderFailure),

    /// Request body (or provider response) could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::MethodNotAllowed(_) => 405,
            CheckoutError::Validation(_) => 400,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Provider(_) => 500,
            CheckoutError::Serialization(_) => 400,
        }
    }

    /// Message suitable for the response body.
    ///
    /// Provider failures report the provider's own message rather than
    /// the prefixed `Display` form.
    pub fn public_message(&self) -> String {
        match self {
            CheckoutError::Provider(failure) => failure.message.clone(),
            other => other.to_string(),
        }
    }

    /// Provider details, when the failure came from the provider
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            CheckoutError::Provider(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ProviderFailure> for CheckoutError {
    fn from(failure: ProviderFailure) -> Self {
        CheckoutError::Provider(failure)
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
