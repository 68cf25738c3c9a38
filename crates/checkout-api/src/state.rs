//! # Application State
//!
//! Shared state for the Axum application: the session provider, the
//! checkout settings, and the server configuration.

use checkout_core::{BoxedSessionProvider, CheckoutError, CheckoutResult, CheckoutSettings};
use checkout_stripe::StripeCheckoutProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_format: match std::env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// The session provider, or why there is none.
///
/// A missing or malformed secret does not stop the server; each checkout
/// reports it as a configuration error instead.
#[derive(Clone)]
pub enum ProviderSlot {
    Ready(BoxedSessionProvider),
    Unavailable(String),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: ProviderSlot,
    pub settings: Arc<CheckoutSettings>,
    pub config: AppConfig,
}

impl AppState {
    /// Create state with the Stripe provider configured from the environment
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let settings = CheckoutSettings::load()
            .map_err(|e| anyhow::anyhow!("Failed to load checkout settings: {}", e))?;

        let provider = match StripeCheckoutProvider::from_env() {
            Ok(stripe) => {
                let mode = if stripe.config().is_test_mode() { "test" } else { "live" };
                info!("Stripe configured in {} mode", mode);
                ProviderSlot::Ready(Arc::new(stripe))
            }
            Err(err) => {
                warn!("Stripe is not configured, checkouts will fail: {}", err);
                ProviderSlot::Unavailable(match err {
                    CheckoutError::Configuration(message) => message,
                    other => other.to_string(),
                })
            }
        };

        Ok(Self {
            provider,
            settings: Arc::new(settings),
            config,
        })
    }

    /// Create state around an explicit provider
    pub fn with_provider(provider: BoxedSessionProvider, settings: CheckoutSettings) -> Self {
        Self {
            provider: ProviderSlot::Ready(provider),
            settings: Arc::new(settings),
            config: AppConfig::default(),
        }
    }

    /// Create state with no usable provider
    pub fn unconfigured(reason: impl Into<String>, settings: CheckoutSettings) -> Self {
        Self {
            provider: ProviderSlot::Unavailable(reason.into()),
            settings: Arc::new(settings),
            config: AppConfig::default(),
        }
    }

    /// The provider, or the configuration error explaining its absence
    pub fn provider(&self) -> CheckoutResult<&BoxedSessionProvider> {
        match &self.provider {
            ProviderSlot::Ready(provider) => Ok(provider),
            ProviderSlot::Unavailable(reason) => Err(CheckoutError::Configuration(reason.clone())),
        }
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        match &self.provider {
            ProviderSlot::Ready(provider) => Some(provider.provider_name()),
            ProviderSlot::Unavailable(_) => None,
        }
    }
}
