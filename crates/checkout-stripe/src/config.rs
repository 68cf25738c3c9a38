//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! The secret key is loaded from the environment.

use checkout_core::{CheckoutError, CheckoutResult};
use std::fmt;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const KEY_PREFIXES: [&str; 4] = ["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Timeout for the session-creation call
    pub timeout: Duration,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `STRIPE_SECRET_KEY`.
    /// Optional: `STRIPE_API_BASE_URL`, `STRIPE_TIMEOUT_SECS`.
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CheckoutError::Configuration("STRIPE_SECRET_KEY not set".to_string())
            })?;

        validate_secret_key(&secret_key)?;

        let mut config = Self::new(secret_key);

        if let Some(url) = lookup("STRIPE_API_BASE_URL").filter(|u| !u.is_empty()) {
            config = config.with_api_base_url(url);
        }

        if let Some(raw) = lookup("STRIPE_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "STRIPE_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Create config with an explicit key (not validated)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Reject keys that cannot be Stripe secret or restricted keys
pub fn validate_secret_key(key: &str) -> CheckoutResult<()> {
    if KEY_PREFIXES.iter().any(|p| key.starts_with(*p) && key.len() > p.len()) {
        return Ok(());
    }

    let hint = if key.starts_with("pk_") {
        " (got a publishable key)"
    } else {
        ""
    };
    Err(CheckoutError::Configuration(format!(
        "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_{}",
        hint
    )))
}

fn redact(key: &str) -> String {
    match KEY_PREFIXES.iter().find(|p| key.starts_with(**p)) {
        Some(prefix) => format!("{}***", prefix),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = StripeConfig::from_lookup(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc123"),
            ("STRIPE_API_BASE_URL", "http://127.0.0.1:9999/"),
            ("STRIPE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert!(config.is_test_mode());
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_key() {
        let err = StripeConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(ref m) if m.contains("not set")));

        let err = StripeConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "")])).unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(_)));
    }

    #[test]
    fn test_malformed_key() {
        assert!(validate_secret_key("sk_live_abc").is_ok());
        assert!(validate_secret_key("rk_test_abc").is_ok());
        assert!(validate_secret_key("sk_test_").is_err());
        assert!(validate_secret_key("hunter2").is_err());

        let err = validate_secret_key("pk_test_abc").unwrap_err();
        assert!(err.to_string().contains("publishable"));
    }

    #[test]
    fn test_bad_timeout() {
        let err = StripeConfig::from_lookup(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc123"),
            ("STRIPE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(_)));
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = StripeConfig::new("sk_live_supersecret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("sk_live_***"));
    }
}
