//! # coaching-payments
//!
//! Package catalog, purchase validation and Stripe integration for the
//! coaching booking backend.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │ Booking form │────▶│  Stripe Hosted  │────▶│  Thank-you   │
//! │  (frontend)  │     │  Checkout Page  │     │     page     │
//! └──────────────┘     └────────┬────────┘     └──────────────┘
//!                               │ checkout.session.completed
//!                               ▼
//!                      ┌─────────────────┐
//!                      │ POST /webhook   │
//!                      └─────────────────┘
//! ```
//!
//! Nothing is stored between the two halves: the validated
//! [`PurchaseIntent`] rides along as checkout session metadata and comes
//! back in the completion event.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coaching_payments::{CheckoutForm, CheckoutProvider, CheckoutRequest,
//!     PackageCatalog, RedirectUrls, StripeClient};
//!
//! let catalog = PackageCatalog::default_menu();
//! let stripe = StripeClient::new("sk_test_xxx");
//!
//! let (intent, package) = form.validate(&catalog)?;
//! let request = CheckoutRequest::from_intent(
//!     &intent,
//!     package,
//!     &catalog,
//!     &RedirectUrls::from_base("https://yoursite.com/"),
//! );
//! let session = stripe.create_checkout_session(request).await?;
//!
//! // Redirect user to: session.redirect_url
//! ```

mod catalog;
mod checkout;
mod error;
mod intent;
mod mock;
mod webhook;

pub use catalog::{format_cents, Package, PackageCatalog};
pub use checkout::{
    CheckoutProvider, CheckoutRequest, CheckoutSession, LineItem, RedirectUrls, StripeClient,
};
pub use error::{PaymentError, Result, ValidationError};
pub use intent::{is_valid_email, CheckoutForm, PurchaseIntent};
pub use mock::MockCheckoutProvider;
pub use webhook::{
    parse_event, signature_header, CompletedPurchase, WebhookEvent, WebhookVerifier,
    CHECKOUT_COMPLETED, DEFAULT_TOLERANCE_SECS,
};
