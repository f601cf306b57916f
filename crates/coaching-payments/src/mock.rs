//! Mock Checkout Provider
//!
//! For testing and local demos. Records every request and hands back
//! deterministic hosted-page URLs without talking to Stripe.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::checkout::{CheckoutProvider, CheckoutRequest, CheckoutSession};
use crate::error::{PaymentError, Result};

/// In-memory checkout provider
pub struct MockCheckoutProvider {
    base_url: String,
    fail: bool,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl Default for MockCheckoutProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCheckoutProvider {
    pub fn new() -> Self {
        Self::with_base_url("https://checkout.stripe.test/c/pay")
    }

    /// Sessions redirect to `<base_url>/<session id>`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails, as with a revoked API key
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        if self.fail {
            return Err(PaymentError::Stripe("mock provider configured to fail".into()));
        }

        let id = format!("cs_test_{}", uuid::Uuid::new_v4().simple());
        let redirect_url = format!("{}/{id}", self.base_url);
        self.requests.lock().await.push(request);

        Ok(CheckoutSession { id, redirect_url })
    }

    fn name(&self) -> &str {
        "MockCheckout"
    }
}
