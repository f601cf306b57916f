//! Stripe Checkout Integration
//!
//! Turns a validated purchase into a hosted checkout session. The session
//! metadata carries the whole intent, so nothing is stored between checkout
//! creation and the completion webhook.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionPaymentMethodTypes, Currency,
};

use crate::catalog::{Package, PackageCatalog};
use crate::error::{PaymentError, Result};
use crate::intent::PurchaseIntent;

/// Where the hosted page sends the buyer afterwards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Derive both targets from the frontend base URL
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            success_url: format!("{base}/thank_you"),
            cancel_url: format!("{base}/"),
        }
    }
}

/// Single line item of a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    /// Smallest currency unit
    pub unit_amount: i64,
    /// Lowercase ISO code
    pub currency: String,
    pub quantity: u64,
}

/// Provider-independent description of the session to create
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub line_item: LineItem,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

impl CheckoutRequest {
    /// Build the session descriptor for a validated intent.
    ///
    /// The price always comes from the catalog package, never from the
    /// submitted amount.
    pub fn from_intent(
        intent: &PurchaseIntent,
        package: &Package,
        catalog: &PackageCatalog,
        redirects: &RedirectUrls,
    ) -> Self {
        Self {
            line_item: LineItem {
                name: package.description.clone(),
                description: catalog.product_line().to_string(),
                unit_amount: package.price_cents,
                currency: catalog.currency().to_string(),
                quantity: 1,
            },
            customer_email: intent.buyer_email.clone(),
            success_url: redirects.success_url.clone(),
            cancel_url: redirects.cancel_url.clone(),
            metadata: intent.to_metadata(),
        }
    }
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider session ID
    pub id: String,

    /// URL to redirect the buyer to
    pub redirect_url: String,
}

/// Payment provider seam (Strategy pattern)
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session. Not retried on failure.
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let currency: Currency = request
            .line_item
            .currency
            .parse()
            .map_err(|_| PaymentError::Config(format!("unsupported currency {}", request.line_item.currency)))?;

        let mut params = CreateCheckoutSession::new();
        params.customer_email = Some(&request.customer_email);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.metadata = Some(request.metadata.clone());

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(request.line_item.quantity),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency,
                unit_amount: Some(request.line_item.unit_amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.line_item.name.clone(),
                    description: Some(request.line_item.description.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let redirect_url = session.url.ok_or_else(|| {
            PaymentError::Stripe("No checkout URL returned".into())
        })?;

        tracing::info!(
            session_id = %session.id,
            email = %request.customer_email,
            "Created Stripe checkout session"
        );

        Ok(CheckoutSession {
            id: session.id.to_string(),
            redirect_url,
        })
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> PurchaseIntent {
        PurchaseIntent {
            buyer_email: "a@b.com".into(),
            in_game_name: "Foo".into(),
            discord_handle: "Foo#1".into(),
            package_id: "option3".into(),
            amount_cents: 5000,
        }
    }

    #[test]
    fn test_redirect_urls() {
        let with_slash = RedirectUrls::from_base("https://example.github.io/");
        let without = RedirectUrls::from_base("https://example.github.io");
        assert_eq!(with_slash, without);
        assert_eq!(with_slash.success_url, "https://example.github.io/thank_you");
        assert_eq!(with_slash.cancel_url, "https://example.github.io/");
    }

    #[test]
    fn test_request_from_intent() {
        let catalog = PackageCatalog::default_menu();
        let package = catalog.get("option3").unwrap();
        let redirects = RedirectUrls::from_base("https://example.github.io/");

        let request = CheckoutRequest::from_intent(&intent(), package, &catalog, &redirects);

        assert_eq!(request.line_item.name, "Option 3: $50 AUD - 60 minutes");
        assert_eq!(request.line_item.description, "1-on-1 Coaching Session");
        assert_eq!(request.line_item.unit_amount, 5000);
        assert_eq!(request.line_item.currency, "aud");
        assert_eq!(request.line_item.quantity, 1);
        assert_eq!(request.customer_email, "a@b.com");
        assert_eq!(request.metadata.get("package_id").map(String::as_str), Some("option3"));
        assert_eq!(request.metadata.get("amount_cents").map(String::as_str), Some("5000"));
    }

    #[test]
    fn test_price_comes_from_catalog() {
        let catalog = PackageCatalog::default_menu();
        let package = catalog.get("option1").unwrap();
        let mut forged = intent();
        forged.amount_cents = 1;

        let request = CheckoutRequest::from_intent(
            &forged,
            package,
            &catalog,
            &RedirectUrls::from_base("https://x.io"),
        );
        assert_eq!(request.line_item.unit_amount, 7000);
    }
}
