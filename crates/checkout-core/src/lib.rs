//! # checkout-core
//!
//! Core types and traits for the cart-checkout handler.
//!
//! This crate provides:
//! - `Cart` and `CartItem`: the validated cart payload
//! - `CheckoutSessionParams`: what a provider needs to create a hosted checkout
//! - `build_session_params`: the cart-to-session mapping (line items, shipping)
//! - `CheckoutSettings`: deployment settings from TOML and the environment
//! - `SessionProvider` trait for implementing payment providers
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{build_session_params, Cart, CheckoutSettings};
//!
//! let settings = CheckoutSettings::load()?;
//! let cart = Cart::from_json(body, &settings.currency)?;
//! let urls = settings.redirect_urls(origin_header);
//!
//! let params = build_session_params(&cart, &settings, urls)?;
//! let session = provider.create_session(&params).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod provider;
pub mod session;
pub mod settings;

// Re-exports for convenience
pub use cart::{Cart, CartItem, CartItemPayload, CartPayload, Currency, PriceSource};
pub use checkout::{build_session_params, line_item, shipping_rate};
pub use error::{CheckoutError, CheckoutResult, ProviderFailure};
pub use provider::{BoxedSessionProvider, SessionProvider};
pub use session::{
    AdjustableQuantity, CheckoutSessionParams, CreatedSession, DropdownField, DropdownOption,
    LineItemPrice, RedirectUrls, SessionLineItem,
};
pub use settings::{CheckoutSettings, DEFAULT_ORIGIN};
