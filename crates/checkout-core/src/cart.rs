//! # Cart Types
//!
//! The cart payload posted by the storefront, and the validated `Cart`
//! the rest of the checkout flow works with.
//!
//! Items either reference a catalog price that already exists at the
//! provider (`price` / `priceId`), or carry an inline price (`amount` in
//! minor units plus `name`).

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body of `POST /checkout`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Option<Vec<CartItemPayload>>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One item as sent by the storefront
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPayload {
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub price_id: Option<String>,
    /// Unit amount in minor currency units (HK$350 -> 35000)
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

// =============================================================================
// Currency
// =============================================================================

/// ISO 4217 currency code, stored lowercase as the provider expects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> CheckoutResult<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CheckoutError::Validation(format!(
                "Invalid currency code: {:?}",
                code
            )));
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self("hkd".to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_uppercase())
    }
}

impl TryFrom<String> for Currency {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

// =============================================================================
// Validated Cart
// =============================================================================

/// Where an item's price comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Pre-existing provider price (price_...), used verbatim
    Catalog {
        price_id: String,
        label: Option<String>,
    },
    /// Price built on the fly from the cart data
    Inline {
        name: String,
        unit_amount: i64,
        currency: Currency,
    },
}

/// A validated cart item
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub price: PriceSource,
    pub quantity: u32,
    pub metadata: Map<String, Value>,
}

impl CartItem {
    /// Item referencing a catalog price
    pub fn catalog(price_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            price: PriceSource::Catalog {
                price_id: price_id.into(),
                label: None,
            },
            quantity,
            metadata: Map::new(),
        }
    }

    /// Item with an inline price
    pub fn inline(
        name: impl Into<String>,
        unit_amount: i64,
        currency: Currency,
        quantity: u32,
    ) -> Self {
        Self {
            price: PriceSource::Inline {
                name: name.into(),
                unit_amount,
                currency,
            },
            quantity,
            metadata: Map::new(),
        }
    }

    /// Builder: add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Display name, if the storefront sent one
    pub fn name(&self) -> Option<&str> {
        match &self.price {
            PriceSource::Catalog { label, .. } => label.as_deref(),
            PriceSource::Inline { name, .. } => Some(name),
        }
    }

    /// Locally known total for this item.
    ///
    /// `None` for catalog prices, whose amount lives at the provider.
    pub fn inline_total(&self) -> Option<i64> {
        match &self.price {
            PriceSource::Catalog { .. } => None,
            PriceSource::Inline { unit_amount, .. } => {
                Some(unit_amount.saturating_mul(i64::from(self.quantity)))
            }
        }
    }

    fn from_payload(
        index: usize,
        item: CartItemPayload,
        currency: &Currency,
    ) -> CheckoutResult<Self> {
        let quantity = match item.quantity {
            None => 1,
            Some(q) if q < 1 => {
                return Err(CheckoutError::Validation(format!(
                    "Item {}: quantity must be at least 1",
                    index
                )))
            }
            Some(q) => u32::try_from(q).map_err(|_| {
                CheckoutError::Validation(format!("Item {}: quantity is too large", index))
            })?,
        };

        let price_id = item
            .price
            .filter(|p| !p.is_empty())
            .or(item.price_id.filter(|p| !p.is_empty()));
        let name = item.name.filter(|n| !n.trim().is_empty());

        let price = match (price_id, item.amount, name) {
            (Some(price_id), _, label) => PriceSource::Catalog { price_id, label },
            (None, Some(amount), _) if amount < 0 => {
                return Err(CheckoutError::Validation(format!(
                    "Item {}: amount must be a non-negative count of minor currency units",
                    index
                )))
            }
            (None, Some(unit_amount), Some(name)) => {
                let currency = match item.currency.as_deref() {
                    Some(code) => Currency::parse(code)?,
                    None => currency.clone(),
                };
                PriceSource::Inline {
                    name,
                    unit_amount,
                    currency,
                }
            }
            _ => {
                return Err(CheckoutError::Validation(format!(
                    "Item {}: provide either a price id or an amount and name",
                    index
                )))
            }
        };

        Ok(Self {
            price,
            quantity,
            metadata: item.metadata.unwrap_or_default(),
        })
    }
}

/// A validated, non-empty cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub currency: Currency,
}

impl Cart {
    /// Parse and validate a raw request body.
    ///
    /// An empty body is treated as `{}`.
    pub fn from_json(body: &[u8], default_currency: &Currency) -> CheckoutResult<Self> {
        let payload: CartPayload = if body.iter().all(u8::is_ascii_whitespace) {
            CartPayload::default()
        } else {
            serde_json::from_slice(body)?
        };
        Self::from_payload(payload, default_currency)
    }

    /// Validate a parsed payload
    pub fn from_payload(payload: CartPayload, default_currency: &Currency) -> CheckoutResult<Self> {
        let items = payload.items.unwrap_or_default();
        if items.is_empty() {
            return Err(CheckoutError::Validation("No items provided".to_string()));
        }

        let currency = match payload.currency.as_deref() {
            Some(code) => Currency::parse(code)?,
            None => default_currency.clone(),
        };

        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| CartItem::from_payload(i, item, &currency))
            .collect::<CheckoutResult<Vec<_>>>()?;

        Ok(Self { items, currency })
    }

    /// Sum of `amount x quantity` over inline-priced items
    pub fn inline_subtotal(&self) -> i64 {
        self.items
            .iter()
            .filter_map(CartItem::inline_total)
            .fold(0i64, i64::saturating_add)
    }

    /// Total quantity across all items
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Readable snapshot kept in the session metadata:
    /// `[{ name, quantity, ...metadata }]`
    pub fn snapshot(&self) -> Value {
        let entries = self
            .items
            .iter()
            .map(|item| {
                let mut entry = Map::new();
                if let Some(name) = item.name() {
                    entry.insert("name".to_string(), Value::from(name));
                }
                entry.insert("quantity".to_string(), Value::from(item.quantity));
                for (key, value) in &item.metadata {
                    entry.insert(key.clone(), value.clone());
                }
                Value::Object(entry)
            })
            .collect();
        Value::Array(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hkd() -> Currency {
        Currency::default()
    }

    fn parse(body: Value) -> CheckoutResult<Cart> {
        Cart::from_json(body.to_string().as_bytes(), &hkd())
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = parse(json!({ "items": [], "currency": "usd" })).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref m) if m == "No items provided"));

        let err = parse(json!({ "currency": "usd" })).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn test_empty_body_is_validation_error() {
        let err = Cart::from_json(b"", &hkd()).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn test_malformed_body_is_serialization_error() {
        let err = Cart::from_json(b"{\"items\": [", &hkd()).unwrap_err();
        assert!(matches!(err, CheckoutError::Serialization(_)));

        let err = Cart::from_json(b"{\"items\": \"tee\"}", &hkd()).unwrap_err();
        assert!(matches!(err, CheckoutError::Serialization(_)));
    }

    #[test]
    fn test_catalog_item_defaults_quantity() {
        let cart = parse(json!({ "items": [{ "price": "price_123" }] })).unwrap();
        assert_eq!(cart.items[0], CartItem::catalog("price_123", 1));
    }

    #[test]
    fn test_price_id_alias() {
        let cart = parse(json!({ "items": [{ "priceId": "price_abc", "quantity": 2 }] })).unwrap();
        assert_eq!(cart.items[0], CartItem::catalog("price_abc", 2));
    }

    #[test]
    fn test_inline_item_keeps_amount() {
        let cart = parse(json!({
            "items": [{ "name": "Tee", "amount": 35000, "quantity": 2 }],
            "currency": "USD"
        }))
        .unwrap();

        let expected = CartItem::inline("Tee", 35000, Currency::parse("usd").unwrap(), 2);
        assert_eq!(cart.items[0], expected);
        assert_eq!(cart.currency.as_str(), "usd");
    }

    #[test]
    fn test_item_currency_overrides_request_currency() {
        let cart = parse(json!({
            "items": [{ "name": "Tee", "amount": 100, "currency": "eur" }],
            "currency": "usd"
        }))
        .unwrap();

        match &cart.items[0].price {
            PriceSource::Inline { currency, .. } => assert_eq!(currency.as_str(), "eur"),
            other => panic!("unexpected price source: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_items_rejected() {
        let err = parse(json!({ "items": [{ "name": "Tee", "amount": -1 }] })).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));

        let err = parse(json!({ "items": [{ "name": "Tee", "amount": 100, "quantity": 0 }] }))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref m) if m.contains("quantity")));

        let err = parse(json!({ "items": [{ "amount": 100 }] })).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref m) if m.starts_with("Item 0")));

        let err = parse(json!({ "items": [{ "price": "price_1" }, { "name": "Tee" }] }))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref m) if m.starts_with("Item 1")));
    }

    #[test]
    fn test_invalid_currency_rejected() {
        assert!(Currency::parse("hk").is_err());
        assert!(Currency::parse("12$").is_err());
        assert_eq!(Currency::parse(" HKD ").unwrap().as_str(), "hkd");
        assert_eq!(Currency::parse("hkd").unwrap().to_string(), "HKD");
    }

    #[test]
    fn test_inline_subtotal_excludes_catalog_items() {
        let cart = parse(json!({
            "items": [
                { "name": "Tee", "amount": 10000, "quantity": 2 },
                { "price": "price_hoodie", "quantity": 5 },
                { "name": "Cap", "amount": 5000 }
            ]
        }))
        .unwrap();

        assert_eq!(cart.inline_subtotal(), 25000);
        assert_eq!(cart.item_count(), 8);
    }

    #[test]
    fn test_snapshot_spreads_metadata() {
        let cart = parse(json!({
            "items": [
                { "name": "Tee", "amount": 100, "metadata": { "size": "M", "color": "black" } },
                { "price": "price_1", "quantity": 3 }
            ]
        }))
        .unwrap();

        assert_eq!(
            cart.snapshot(),
            json!([
                { "name": "Tee", "quantity": 1, "size": "M", "color": "black" },
                { "quantity": 3 }
            ])
        );
    }
}
