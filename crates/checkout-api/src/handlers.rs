//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use checkout_core::{build_session_params, Cart, CheckoutError};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Successful checkout: where to send the customer
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// HTTP status the provider answered with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status,
            error_type: None,
            code: None,
            provider_status: None,
        }
    }
}

impl From<&CheckoutError> for ErrorResponse {
    fn from(err: &CheckoutError) -> Self {
        let mut response = ErrorResponse::new(err.public_message(), err.status_code());
        if let Some(failure) = err.provider_failure() {
            response.error_type = failure.error_type.clone();
            response.code = failure.code.clone();
            response.provider_status = failure.http_status;
        }
        response
    }
}

/// A `CheckoutError` rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub CheckoutError);

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self.0);
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = ?self.0, "Checkout failed: {}", self.0);
        } else {
            warn!("Checkout rejected: {}", self.0);
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cart-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for the posted cart.
///
/// Mounted for every method so that anything but POST gets a JSON 405
/// before the body is looked at.
#[instrument(skip(state, method, headers, body), fields(method = %method))]
pub async fn create_checkout(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if method != Method::POST {
        return Err(CheckoutError::MethodNotAllowed(method.to_string()).into());
    }

    let settings = &state.settings;
    let cart = Cart::from_json(&body, &settings.currency)?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let urls = settings.redirect_urls(origin);

    let params = build_session_params(&cart, settings, urls)?;
    let provider = state.provider()?;

    info!(
        "Creating checkout: {} items ({} units), inline_subtotal={}, shipping={:?}, success_url={}",
        cart.items.len(),
        cart.item_count(),
        cart.inline_subtotal(),
        params.shipping_rate,
        params.success_url
    );

    let session = provider.create_session(&params).await?;

    info!(
        "Created {} checkout session: {}",
        session.provider, session.session_id
    );

    Ok(Json(CheckoutResponse { url: session.url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::ProviderFailure;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_validation_error_conversion() {
        let err = CheckoutError::Validation("No items provided".to_string());
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError(CheckoutError::MethodNotAllowed("GET".into())).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[test]
    fn test_provider_fields_serialized() {
        let err: CheckoutError = ProviderFailure::new("stripe", "Your card was declined")
            .with_type("card_error")
            .with_code("card_declined")
            .with_http_status(402)
            .into();

        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Your card was declined",
                "status": 500,
                "type": "card_error",
                "code": "card_declined",
                "provider_status": 402
            })
        );
    }

    #[test]
    fn test_plain_error_omits_provider_fields() {
        let err = CheckoutError::Configuration("STRIPE_SECRET_KEY not set".into());
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Configuration error: STRIPE_SECRET_KEY not set",
                "status": 500
            })
        );
    }
}
