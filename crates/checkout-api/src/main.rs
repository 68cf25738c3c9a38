//! # Cart Checkout
//!
//! Turns storefront carts into hosted Stripe checkout sessions.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export SHIPPING_RATE_ID=shr_...          # optional
//! export FREE_SHIPPING_THRESHOLD=30000     # optional, minor units
//! export SITE_ORIGIN=https://shop.example  # optional
//!
//! # Run the server
//! cart-checkout
//! ```

use checkout_api::{routes, AppConfig, AppState, LogFormat};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    // Initialize application state
    let state = AppState::new(config)?;

    info!("Environment: {}", state.config.environment);
    info!(
        "Payment provider: {}",
        state.provider_name().unwrap_or("unconfigured")
    );
    info!(
        "Shipping rate: {:?}, free shipping from: {:?}",
        state.settings.shipping_rate_id,
        state.settings.free_shipping_threshold()
    );

    // Create router
    let app = routes::create_router(state);

    info!("Cart checkout listening on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
