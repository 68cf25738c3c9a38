//! # Checkout Session Types
//!
//! Provider-facing session parameters and the session the provider hands
//! back. Providers translate `CheckoutSessionParams` into their own wire
//! format.

use crate::cart::Currency;
use crate::error::{CheckoutError, CheckoutResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest quantity the hosted page may offer
pub const MAX_ADJUSTABLE_QUANTITY: u32 = 99;

/// Range the customer may adjust quantity within on the hosted page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustableQuantity {
    pub minimum: u32,
    pub maximum: u32,
}

impl AdjustableQuantity {
    /// Require `1 <= minimum <= maximum <= 99`
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.minimum < 1 || self.minimum > self.maximum {
            return Err(CheckoutError::Configuration(format!(
                "adjustable_quantity: minimum {} must be between 1 and maximum {}",
                self.minimum, self.maximum
            )));
        }
        if self.maximum > MAX_ADJUSTABLE_QUANTITY {
            return Err(CheckoutError::Configuration(format!(
                "adjustable_quantity: maximum {} exceeds {}",
                self.maximum, MAX_ADJUSTABLE_QUANTITY
            )));
        }
        Ok(())
    }
}

impl Default for AdjustableQuantity {
    fn default() -> Self {
        Self {
            minimum: 1,
            maximum: 10,
        }
    }
}

/// Price of a session line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemPrice {
    /// Existing provider price id
    Catalog(String),
    /// Price data sent along with the session
    Inline {
        currency: Currency,
        unit_amount: i64,
        product_name: String,
    },
}

/// One line of the checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    pub price: LineItemPrice,
    pub quantity: u32,
    pub adjustable_quantity: Option<AdjustableQuantity>,
}

/// Dropdown custom field shown on the hosted page (e.g. a size selector)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownField {
    /// Key the answer is stored under
    pub key: String,
    pub label: String,
    pub options: Vec<DropdownOption>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownField {
    /// Size selector with one option per size label; required unless `optional`
    pub fn size_selector<S: AsRef<str>>(sizes: &[S], optional: bool) -> Self {
        Self {
            key: "size".to_string(),
            label: "Size".to_string(),
            options: sizes
                .iter()
                .map(|s| DropdownOption {
                    label: s.as_ref().to_string(),
                    value: s.as_ref().to_lowercase(),
                })
                .collect(),
            optional,
        }
    }
}

/// Success and cancel redirect targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Join an origin with the configured paths, trimming a trailing `/`
    pub fn from_origin(origin: &str, success_path: &str, cancel_path: &str) -> Self {
        let origin = origin.trim().trim_end_matches('/');
        Self {
            success_url: format!("{}{}", origin, success_path),
            cancel_url: format!("{}{}", origin, cancel_path),
        }
    }
}

/// Everything a provider needs to create a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Countries shipping addresses may come from (empty = no collection)
    pub allowed_countries: Vec<String>,
    pub shipping_rate: Option<String>,
    pub allow_promotion_codes: bool,
    pub custom_fields: Vec<DropdownField>,
    pub metadata: BTreeMap<String, String>,
    pub idempotency_key: String,
}

/// A session created by the provider
#[derive(Debug, Clone)]
pub struct CreatedSession {
    /// Provider's session ID
    pub session_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect the customer to
    pub url: String,

    /// When the session expires
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_urls_from_origin() {
        let urls = RedirectUrls::from_origin("https://shop.example/", "/success.html", "/");
        assert_eq!(urls.success_url, "https://shop.example/success.html");
        assert_eq!(urls.cancel_url, "https://shop.example/");
    }

    #[test]
    fn test_size_selector() {
        let field = DropdownField::size_selector(&["S", "M", "XL"], false);
        assert_eq!(field.key, "size");
        assert!(!field.optional);
        assert_eq!(field.options.len(), 3);
        assert_eq!(field.options[2].label, "XL");
        assert_eq!(field.options[2].value, "xl");
    }

    #[test]
    fn test_default_adjustable_range() {
        let range = AdjustableQuantity::default();
        assert_eq!((range.minimum, range.maximum), (1, 10));
    }

    #[test]
    fn test_adjustable_range_bounds() {
        assert!(AdjustableQuantity::default().validate().is_ok());
        assert!(AdjustableQuantity { minimum: 3, maximum: 3 }.validate().is_ok());
        assert!(AdjustableQuantity { minimum: 1, maximum: 99 }.validate().is_ok());

        assert!(AdjustableQuantity { minimum: 0, maximum: 10 }.validate().is_err());
        assert!(AdjustableQuantity { minimum: 5, maximum: 2 }.validate().is_err());
        let err = AdjustableQuantity { minimum: 1, maximum: 5000 }.validate().unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(ref m) if m.contains("5000")));
    }
}
