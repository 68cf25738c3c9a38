//! # checkout-stripe
//!
//! Stripe provider for cart-checkout-rs.
//!
//! `StripeCheckoutProvider` implements `SessionProvider` on top of the
//! Checkout Sessions API:
//! - Catalog prices (`price_...`) and inline `price_data` line items
//! - Shipping address collection and shipping rates
//! - Adjustable quantities, promotion codes, dropdown custom fields
//! - Stripe's error `type`/`code` surfaced on failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeCheckoutProvider;
//! use checkout_core::SessionProvider;
//!
//! // Create provider from environment (STRIPE_SECRET_KEY)
//! let provider = StripeCheckoutProvider::from_env()?;
//!
//! let session = provider.create_session(&params).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod checkout;
pub mod config;
pub mod form;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::{validate_secret_key, StripeConfig};
pub use form::session_form;
