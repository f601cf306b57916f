//! HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use coaching_payments::{CheckoutForm, CheckoutRequest, PaymentError, WebhookEvent};

use crate::error::ApiError;
use crate::state::AppState;

pub const WELCOME: &str = "Welcome to the Coaching Application API!";
pub const WEBHOOK_ACK: &str = "Webhook received successfully";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub redirect_url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness text
pub async fn root() -> &'static str {
    WELCOME
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Validate a booking and create a hosted checkout session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutForm>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(form) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected checkout body");
        ApiError::InvalidBody
    })?;

    let (intent, package) = form.validate(&state.catalog).map_err(|e| {
        tracing::warn!(reason = %e, code = e.code(), "Validation error");
        PaymentError::from(e)
    })?;

    let request = CheckoutRequest::from_intent(&intent, package, &state.catalog, &state.redirects);

    let session = state.checkout.create_checkout_session(request).await.map_err(|e| {
        tracing::error!(
            provider = state.checkout.name(),
            error = %e,
            "Checkout session error"
        );
        e
    })?;

    tracing::info!(
        session_id = %session.id,
        package = %intent.package_id,
        email = %intent.buyer_email,
        "Checkout session created"
    );

    Ok(Json(CheckoutResponse {
        redirect_url: session.redirect_url,
    }))
}

/// Stripe webhook handler
///
/// Takes the body as a raw string: the signature covers the exact bytes sent.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<&'static str, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Webhook without Stripe signature");
            ApiError::MissingSignature
        })?;

    let event = state.verifier.construct_event(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Webhook verification failed");
        e
    })?;

    tracing::info!(event_id = %event.event_id(), "Webhook received");

    match event {
        WebhookEvent::CheckoutCompleted { purchase, .. } => {
            tracing::info!(
                session_id = %purchase.session_id,
                amount = purchase.amount_charged_cents,
                "Checkout session completed"
            );
            let report = state.notifier.notify(&purchase).await;
            if !report.all_sent() {
                tracing::warn!(
                    session_id = %purchase.session_id,
                    buyer_sent = report.buyer_sent,
                    operator_sent = report.operator_sent,
                    "Confirmation emails incomplete"
                );
            }
        }

        WebhookEvent::MalformedCompletion {
            event_id,
            session_id,
            reason,
        } => {
            tracing::error!(
                event_id = %event_id,
                session_id = %session_id,
                reason = %reason,
                "Completed checkout carries no usable booking metadata"
            );
        }

        WebhookEvent::Other { event_type, .. } => {
            tracing::debug!(event_type = %event_type, "Unhandled webhook event");
        }
    }

    Ok(WEBHOOK_ACK)
}
