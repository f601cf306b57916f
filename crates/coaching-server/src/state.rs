//! Application State

use std::sync::Arc;

use coaching_notify::{CompletionNotifier, Mailer, SmtpMailer};
use coaching_payments::{
    CheckoutProvider, PackageCatalog, RedirectUrls, StripeClient, WebhookVerifier,
};

use crate::config::Config;
use crate::origin::AllowedOrigins;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    /// Coaching menu
    pub catalog: Arc<PackageCatalog>,

    /// Hosted checkout provider (Stripe, or a mock in tests)
    pub checkout: Arc<dyn CheckoutProvider>,

    /// Webhook signature verifier
    pub verifier: Arc<WebhookVerifier>,

    /// Buyer and operator confirmations
    pub notifier: Arc<CompletionNotifier>,

    /// Success and cancel targets for the hosted page
    pub redirects: Arc<RedirectUrls>,

    /// Browser origins allowed to call the API
    pub origins: Arc<AllowedOrigins>,
}

impl AppState {
    /// Wire the production collaborators: Stripe and the SMTP relay
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let checkout = Arc::new(StripeClient::new(&config.stripe_secret_key));
        let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
        Ok(Self::with_providers(
            config,
            PackageCatalog::default_menu(),
            checkout,
            mailer,
        ))
    }

    /// Wire arbitrary collaborators around the configured settings
    pub fn with_providers(
        config: &Config,
        catalog: PackageCatalog,
        checkout: Arc<dyn CheckoutProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let notifier = CompletionNotifier::new(mailer, catalog.clone(), &config.operator_email);

        Self {
            catalog,
            checkout,
            verifier: Arc::new(WebhookVerifier::new(&config.webhook_secret)),
            notifier: Arc::new(notifier),
            redirects: Arc::new(RedirectUrls::from_base(&config.frontend_url)),
            origins: Arc::new(AllowedOrigins::new(config.allowed_origins.iter().cloned())),
        }
    }
}
