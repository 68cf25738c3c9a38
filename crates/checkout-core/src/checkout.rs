//! # Cart to Session Mapping
//!
//! Turns a validated `Cart` into provider-facing `CheckoutSessionParams`:
//! one line item per cart item, the shipping decision, and the cart
//! snapshot kept in the session metadata.

use crate::cart::{Cart, CartItem, PriceSource};
use crate::error::CheckoutResult;
use crate::session::{CheckoutSessionParams, LineItemPrice, RedirectUrls, SessionLineItem};
use crate::settings::CheckoutSettings;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Build a session line item for one cart item.
///
/// Catalog prices are passed through verbatim; inline prices keep the
/// exact minor-unit amount.
pub fn line_item(item: &CartItem, settings: &CheckoutSettings) -> SessionLineItem {
    let price = match &item.price {
        PriceSource::Catalog { price_id, .. } => LineItemPrice::Catalog(price_id.clone()),
        PriceSource::Inline {
            name,
            unit_amount,
            currency,
        } => LineItemPrice::Inline {
            currency: currency.clone(),
            unit_amount: *unit_amount,
            product_name: name.clone(),
        },
    };

    SessionLineItem {
        price,
        quantity: item.quantity,
        adjustable_quantity: settings.adjustable_quantity,
    }
}

/// Shipping rate to attach, if any.
///
/// With a free-shipping threshold configured, the rate is dropped once the
/// inline subtotal reaches it. Catalog-priced items do not count toward
/// the subtotal.
pub fn shipping_rate(cart: &Cart, settings: &CheckoutSettings) -> Option<String> {
    let rate = settings.shipping_rate_id.as_ref()?;

    match settings.free_shipping_threshold() {
        Some(threshold) => {
            let subtotal = cart.inline_subtotal();
            if subtotal >= threshold {
                debug!(subtotal, threshold, "Free shipping threshold met");
                None
            } else {
                Some(rate.clone())
            }
        }
        None => Some(rate.clone()),
    }
}

/// Assemble the full session parameters for a cart
pub fn build_session_params(
    cart: &Cart,
    settings: &CheckoutSettings,
    urls: RedirectUrls,
) -> CheckoutResult<CheckoutSessionParams> {
    let line_items = cart
        .items
        .iter()
        .map(|item| line_item(item, settings))
        .collect();

    let mut metadata = BTreeMap::new();
    metadata.insert("cart".to_string(), serde_json::to_string(&cart.snapshot())?);

    Ok(CheckoutSessionParams {
        line_items,
        success_url: urls.success_url,
        cancel_url: urls.cancel_url,
        allowed_countries: settings.allowed_countries.clone(),
        shipping_rate: shipping_rate(cart, settings),
        allow_promotion_codes: settings.allow_promotion_codes,
        custom_fields: settings.size_field().into_iter().collect(),
        metadata,
        idempotency_key: Uuid::new_v4().to_string(),
    })
}
