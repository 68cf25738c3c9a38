//! # checkout-api
//!
//! HTTP layer for cart-checkout-rs.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/checkout` | Create checkout session, returns `{ "url": ... }` |
//! | POST | `/api/checkout` | Alias of `/checkout` |
//!
//! Any other method on the checkout paths gets `405`.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat, ProviderSlot};
