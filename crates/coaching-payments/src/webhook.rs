//! Stripe Webhook Handling
//!
//! Verifies the `Stripe-Signature` header against the raw request body and
//! turns the verified payload into a [`WebhookEvent`].

use std::collections::HashMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::{PaymentError, Result};
use crate::intent::PurchaseIntent;

type HmacSha256 = Hmac<Sha256>;

/// Stripe's default replay window
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// The only event type acted upon
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// A paid checkout, recovered from event metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedPurchase {
    pub session_id: String,
    pub intent: PurchaseIntent,
    /// What Stripe actually charged, in minor units
    pub amount_charged_cents: i64,
    /// Lowercase ISO code, when Stripe reported one
    pub currency: Option<String>,
}

/// Parsed webhook event
#[derive(Clone, Debug)]
pub enum WebhookEvent {
    /// Checkout completed - notify buyer and operator
    CheckoutCompleted {
        event_id: String,
        purchase: CompletedPurchase,
    },

    /// Checkout completed, but its metadata does not describe a purchase
    MalformedCompletion {
        event_id: String,
        session_id: String,
        reason: String,
    },

    /// Unhandled event type
    Other {
        event_id: String,
        event_type: String,
    },
}

impl WebhookEvent {
    pub fn event_id(&self) -> &str {
        match self {
            Self::CheckoutCompleted { event_id, .. }
            | Self::MalformedCompletion { event_id, .. }
            | Self::Other { event_id, .. } => event_id,
        }
    }
}

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Deserialize)]
struct RawEventData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct RawCheckoutSession {
    id: String,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

/// Webhook signature verifier
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Override the accepted clock skew
    #[must_use]
    pub const fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }

    /// Verify signature and parse event
    pub fn construct_event(&self, payload: &str, signature: &str) -> Result<WebhookEvent> {
        self.verify(payload, signature, Utc::now().timestamp())?;
        parse_event(payload)
    }

    /// Check `signature` against `payload` as of unix time `now`
    pub fn verify(&self, payload: &str, signature: &str, now: i64) -> Result<()> {
        let header = SignatureHeader::parse(signature)?;

        if now.abs_diff(header.timestamp) > self.tolerance_secs.unsigned_abs() {
            return Err(PaymentError::WebhookSignature(format!(
                "timestamp {} outside tolerance",
                header.timestamp
            )));
        }

        let mac = signed_mac(&self.secret, header.timestamp, payload)?;
        let matched = header.signatures.iter().any(|candidate| {
            hex::decode(candidate).is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
        });

        if matched {
            Ok(())
        } else {
            Err(PaymentError::WebhookSignature("no matching v1 signature".into()))
        }
    }
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Result<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => {
                    timestamp = Some(value.parse::<i64>().map_err(|_| {
                        PaymentError::WebhookSignature("malformed timestamp".into())
                    })?);
                }
                Some(("v1", value)) => signatures.push(value.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| PaymentError::WebhookSignature("missing timestamp".into()))?;
        if signatures.is_empty() {
            return Err(PaymentError::WebhookSignature("missing v1 signature".into()));
        }

        Ok(Self { timestamp, signatures })
    }
}

fn signed_mac(secret: &str, timestamp: i64, payload: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Config(format!("webhook secret: {e}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Build a `Stripe-Signature` header value for `payload`
pub fn signature_header(payload: &str, secret: &str, timestamp: i64) -> Result<String> {
    let mac = signed_mac(secret, timestamp, payload)?;
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Parse a verified payload into our event type
pub fn parse_event(payload: &str) -> Result<WebhookEvent> {
    let event: RawEvent = serde_json::from_str(payload)
        .map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

    if event.event_type != CHECKOUT_COMPLETED {
        return Ok(WebhookEvent::Other {
            event_id: event.id,
            event_type: event.event_type,
        });
    }

    let session: RawCheckoutSession = serde_json::from_value(event.data.object)
        .map_err(|e| PaymentError::WebhookParse(format!("Invalid checkout session data: {e}")))?;

    let metadata = session.metadata.unwrap_or_default();
    match PurchaseIntent::from_metadata(&metadata) {
        Ok(intent) => Ok(WebhookEvent::CheckoutCompleted {
            event_id: event.id,
            purchase: CompletedPurchase {
                session_id: session.id,
                amount_charged_cents: session.amount_total.unwrap_or(intent.amount_cents),
                currency: session.currency.map(|c| c.to_lowercase()),
                intent,
            },
        }),
        Err(e) => Ok(WebhookEvent::MalformedCompletion {
            event_id: event.id,
            session_id: session.id,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";

    fn completed_payload() -> String {
        serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_test_1",
                "amount_total": 5000,
                "currency": "aud",
                "metadata": {
                    "buyer_email": "a@b.com",
                    "in_game_name": "Foo",
                    "discord_handle": "Foo#1",
                    "package_id": "option3",
                    "amount_cents": "5000"
                }
            }}
        })
        .to_string()
    }

    #[test]
    fn test_valid_signature() {
        let payload = completed_payload();
        let now = 1_700_000_000;
        let header = signature_header(&payload, SECRET, now).unwrap();

        let verifier = WebhookVerifier::new(SECRET);
        assert!(verifier.verify(&payload, &header, now + 10).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = completed_payload();
        let now = 1_700_000_000;
        let header = signature_header(&payload, "wrong_secret", now).unwrap();

        let err = WebhookVerifier::new(SECRET).verify(&payload, &header, now).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let payload = completed_payload();
        let now = 1_700_000_000;
        let header = signature_header(&payload, SECRET, now).unwrap();
        let tampered = payload.replace("5000", "1");

        assert!(WebhookVerifier::new(SECRET).verify(&tampered, &header, now).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = completed_payload();
        let signed_at = 1_700_000_000;
        let header = signature_header(&payload, SECRET, signed_at).unwrap();

        let verifier = WebhookVerifier::new(SECRET);
        assert!(verifier.verify(&payload, &header, signed_at + 301).is_err());
        assert!(verifier.with_tolerance(600).verify(&payload, &header, signed_at + 301).is_ok());
    }

    #[test]
    fn test_any_v1_may_match() {
        let payload = completed_payload();
        let now = 1_700_000_000;
        let good = signature_header(&payload, SECRET, now).unwrap();
        let good_sig = good.split_once(",v1=").unwrap().1;
        let header = format!("t={now},v1=deadbeef,v1={good_sig},v0=ignored");

        assert!(WebhookVerifier::new(SECRET).verify(&payload, &header, now).is_ok());
    }

    #[test]
    fn test_malformed_headers() {
        let verifier = WebhookVerifier::new(SECRET);
        for header in ["", "garbage", "t=abc,v1=00", "v1=00", "t=1700000000"] {
            assert!(verifier.verify("{}", header, 1_700_000_000).is_err(), "{header}");
        }
    }

    #[test]
    fn test_extreme_timestamps_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        for t in [i64::MIN, i64::MAX] {
            let header = format!("t={t},v1=00");
            let err = verifier.verify("{}", &header, 1_700_000_000).unwrap_err();
            assert!(matches!(err, PaymentError::WebhookSignature(_)), "{t}");
        }
    }

    #[test]
    fn test_parse_completed_event() {
        let event = parse_event(&completed_payload()).unwrap();
        let WebhookEvent::CheckoutCompleted { event_id, purchase } = event else {
            panic!("expected completed event");
        };
        assert_eq!(event_id, "evt_1");
        assert_eq!(purchase.session_id, "cs_test_1");
        assert_eq!(purchase.intent.in_game_name, "Foo");
        assert_eq!(purchase.amount_charged_cents, 5000);
        assert_eq!(purchase.currency.as_deref(), Some("aud"));
    }

    #[test]
    fn test_charged_amount_preferred_over_metadata() {
        let payload = completed_payload().replace("\"amount_total\":5000", "\"amount_total\":4500");
        let WebhookEvent::CheckoutCompleted { purchase, .. } = parse_event(&payload).unwrap() else {
            panic!("expected completed event");
        };
        assert_eq!(purchase.amount_charged_cents, 4500);
        assert_eq!(purchase.intent.amount_cents, 5000);
    }

    #[test]
    fn test_parse_other_event() {
        let payload = r#"{"id":"evt_2","type":"payment_intent.created","data":{"object":{"id":"pi_1"}}}"#;
        let event = parse_event(payload).unwrap();
        assert!(matches!(
            event,
            WebhookEvent::Other { ref event_type, .. } if event_type == "payment_intent.created"
        ));
        assert_eq!(event.event_id(), "evt_2");
    }

    #[test]
    fn test_completed_without_metadata() {
        let payload = r#"{"id":"evt_3","type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{}}}}"#;
        assert!(matches!(
            parse_event(payload).unwrap(),
            WebhookEvent::MalformedCompletion { .. }
        ));
    }

    #[test]
    fn test_not_an_event() {
        assert!(matches!(
            parse_event("[1,2,3]").unwrap_err(),
            PaymentError::WebhookParse(_)
        ));
    }
}
