//! # Session Provider Trait
//!
//! Seam between the checkout handler and the payment provider that
//! hosts the checkout page.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          SessionProvider (trait)            │
//! │  ├── create_session()                       │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!                       │
//!          ┌────────────┴────────────┐
//!          │ StripeCheckoutProvider  │
//!          └─────────────────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::session::{CheckoutSessionParams, CreatedSession};
use async_trait::async_trait;
use std::sync::Arc;

/// A payment provider able to create hosted checkout sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Create a checkout session and return its redirect URL.
    ///
    /// Exactly one outbound call; failures are returned, never retried.
    async fn create_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> CheckoutResult<CreatedSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedSessionProvider = Arc<dyn SessionProvider>;
