//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! One `POST /v1/checkout/sessions` per checkout; the customer is sent to
//! the hosted page at the returned `url`.

use crate::config::StripeConfig;
use crate::form::session_form;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSessionParams, CreatedSession, ProviderFailure,
    SessionProvider,
};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page; card data never touches this service.
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new provider with its own HTTP client
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.config.api_base_url)
    }
}

#[async_trait]
impl SessionProvider for StripeCheckoutProvider {
    #[instrument(
        skip(self, params),
        fields(items = params.line_items.len(), idempotency_key = %params.idempotency_key)
    )]
    async fn create_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> CheckoutResult<CreatedSession> {
        let form = session_form(params);

        debug!(
            "Creating Stripe checkout session: {} line items, shipping_rate={:?}",
            params.line_items.len(),
            params.shipping_rate
        );

        let response = self
            .client
            .post(self.sessions_url())
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &params.idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(parse_error_response(status.as_u16(), &body).into());
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unreadable Stripe response: status={}, body={}", status, body);
            CheckoutError::Provider(
                ProviderFailure::new(PROVIDER, format!("Failed to parse Stripe response: {}", e))
                    .with_http_status(status.as_u16()),
            )
        })?;

        let url = session.url.filter(|u| !u.is_empty()).ok_or_else(|| {
            CheckoutError::Provider(
                ProviderFailure::new(PROVIDER, "Stripe returned a session without a URL")
                    .with_http_status(status.as_u16()),
            )
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CreatedSession {
            session_id: session.id,
            provider: PROVIDER.to_string(),
            url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Network-level failure (connect, timeout, broken body)
fn transport_failure(err: reqwest::Error) -> CheckoutError {
    let message = if err.is_timeout() {
        format!("Request to Stripe timed out: {}", err)
    } else {
        format!("Could not reach Stripe: {}", err)
    };
    ProviderFailure::new(PROVIDER, message)
        .with_type("api_connection_error")
        .into()
}

/// Turn a non-2xx Stripe response into a `ProviderFailure`
fn parse_error_response(status: u16, body: &str) -> ProviderFailure {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(StripeErrorResponse { error }) => {
            let message = error
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Stripe request failed with HTTP {}", status));
            let mut failure = ProviderFailure::new(PROVIDER, message).with_http_status(status);
            failure.error_type = error.error_type;
            failure.code = error.code;
            if let Some(param) = error.param {
                debug!("Stripe rejected parameter: {}", param);
            }
            failure
        }
        Err(_) => ProviderFailure::new(PROVIDER, format!("HTTP {}: {}", status, body))
            .with_http_status(status),
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}
