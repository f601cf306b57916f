//! Coaching booking HTTP server
//!
//! Axum router exposing checkout creation and the Stripe webhook. The binary
//! in `main.rs` loads [`Config`], wires [`AppState`] and serves [`router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod origin;
pub mod state;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError, StripeMode};
pub use state::AppState;

use crate::handlers::{create_checkout_session, health_check, root, stripe_webhook};
use crate::origin::enforce_origin;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = state.origins.cors_layer();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/webhook", post(stripe_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), enforce_origin))
                .layer(cors),
        )
        .with_state(state)
}
