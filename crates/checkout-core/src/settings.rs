//! # Checkout Settings
//!
//! Deployment-level choices that shape every checkout session: default
//! currency, shipping, redirect paths, and the optional extras shown on
//! the hosted page.
//!
//! Settings come from an optional TOML file (`config/checkout.toml`),
//! then environment variables override individual fields.

use crate::cart::Currency;
use crate::error::{CheckoutError, CheckoutResult};
use crate::session::{AdjustableQuantity, DropdownField, RedirectUrls};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Origin used when the request has no `Origin` header and none is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

const CONFIG_PATHS: [&str; 3] = [
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Currency for inline prices when the request names none
    pub currency: Currency,

    /// Countries accepted for shipping address collection
    pub allowed_countries: Vec<String>,

    /// Provider shipping rate attached to the session (shr_...)
    pub shipping_rate_id: Option<String>,

    /// Inline subtotal (minor units) at which shipping becomes free
    pub free_shipping_threshold: Option<i64>,

    /// Fallback origin for redirect URLs
    pub site_origin: Option<String>,

    pub success_path: String,
    pub cancel_path: String,

    /// Let the customer change quantities on the hosted page
    pub adjustable_quantity: Option<AdjustableQuantity>,

    /// Sizes offered in a size dropdown (empty = no dropdown)
    pub size_options: Vec<String>,

    /// Let the customer skip the size dropdown
    pub size_optional: bool,

    pub allow_promotion_codes: bool,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            allowed_countries: vec!["HK".to_string()],
            shipping_rate_id: None,
            free_shipping_threshold: None,
            site_origin: None,
            success_path: "/success.html".to_string(),
            cancel_path: "/".to_string(),
            adjustable_quantity: None,
            size_options: Vec::new(),
            size_optional: false,
            allow_promotion_codes: false,
        }
    }
}

impl CheckoutSettings {
    /// Parse and validate settings from a TOML string
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let settings: Self = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings every checkout would fail with
    pub fn validate(&self) -> CheckoutResult<()> {
        if let Some(range) = &self.adjustable_quantity {
            range.validate()?;
        }
        Ok(())
    }

    /// Load settings from the config file (if any) and the process environment.
    ///
    /// `CHECKOUT_CONFIG` names the file explicitly; otherwise the usual
    /// `config/checkout.toml` locations are tried.
    pub fn load() -> CheckoutResult<Self> {
        let settings = match std::env::var("CHECKOUT_CONFIG") {
            Ok(path) => Self::read_file(&path)?,
            Err(_) => {
                let mut found = None;
                for path in CONFIG_PATHS {
                    if std::path::Path::new(path).exists() {
                        found = Some(Self::read_file(path)?);
                        break;
                    }
                }
                found.unwrap_or_default()
            }
        };

        Ok(settings.with_env(|key| std::env::var(key).ok()))
    }

    fn read_file(path: &str) -> CheckoutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("Failed to read {}: {}", path, e))
        })?;
        let settings = Self::from_toml(&content).map_err(|e| match e {
            CheckoutError::Configuration(message) => {
                CheckoutError::Configuration(format!("{}: {}", path, message))
            }
            other => other,
        })?;
        info!("Loaded checkout settings from {}", path);
        Ok(settings)
    }

    /// Apply `SHIPPING_RATE_ID`, `FREE_SHIPPING_THRESHOLD` and `SITE_ORIGIN`
    /// from `lookup`, ignoring empty values.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(rate) = var("SHIPPING_RATE_ID") {
            self.shipping_rate_id = Some(rate);
        }

        if let Some(raw) = var("FREE_SHIPPING_THRESHOLD") {
            self.free_shipping_threshold = match raw.parse::<i64>() {
                Ok(cents) if cents > 0 => Some(cents),
                Ok(_) => None,
                Err(_) => {
                    warn!("Ignoring FREE_SHIPPING_THRESHOLD={:?}: not an integer", raw);
                    None
                }
            };
        }

        if let Some(origin) = var("SITE_ORIGIN") {
            self.site_origin = Some(origin);
        }

        self
    }

    /// Threshold, treating zero or negative values as unset
    pub fn free_shipping_threshold(&self) -> Option<i64> {
        self.free_shipping_threshold.filter(|t| *t > 0)
    }

    /// Size dropdown, when sizes are configured
    pub fn size_field(&self) -> Option<DropdownField> {
        if self.size_options.is_empty() {
            None
        } else {
            Some(DropdownField::size_selector(&self.size_options, self.size_optional))
        }
    }

    /// Pick the origin for redirects: request header, then configured, then default
    pub fn origin<'a>(&'a self, request_origin: Option<&'a str>) -> &'a str {
        request_origin
            .map(str::trim)
            .filter(|o| !o.is_empty() && *o != "null")
            .or(self.site_origin.as_deref())
            .unwrap_or(DEFAULT_ORIGIN)
    }

    /// Success and cancel URLs for a request
    pub fn redirect_urls(&self, request_origin: Option<&str>) -> RedirectUrls {
        RedirectUrls::from_origin(
            self.origin(request_origin),
            &self.success_path,
            &self.cancel_path,
        )
    }
}
