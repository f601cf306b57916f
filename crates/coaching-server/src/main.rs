//! Coaching booking server
//!
//! Creates Stripe checkout sessions for the coaching menu and emails
//! confirmations once Stripe reports the payment.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coaching_server::{router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("{e}. Please check your .env file.");
        e
    })?;

    tracing::info!(mode = ?config.stripe_mode, "✓ Stripe configured");
    tracing::info!(host = %config.smtp.host, port = config.smtp.port, "✓ SMTP configured");
    for origin in &config.allowed_origins {
        tracing::info!("  Allowed origin: {}", origin);
    }

    let state = AppState::from_config(&config).context("building application state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!("Server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                        - Liveness");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /create-checkout-session - Create Stripe checkout");
    tracing::info!("  POST /webhook                 - Stripe events");

    axum::serve(listener, app).await?;

    Ok(())
}
