//! Completion Notifier
//!
//! Sends the buyer and operator confirmations for a paid checkout. Each send
//! is attempted independently; failures are logged and reported, never
//! propagated, because the payment itself has already succeeded.

use std::sync::Arc;

use coaching_payments::{CompletedPurchase, PackageCatalog};

use crate::confirmation::{Confirmation, Recipient};
use crate::mailer::Mailer;

/// Outcome of one notification round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationReport {
    pub buyer_sent: bool,
    pub operator_sent: bool,
}

impl NotificationReport {
    pub const fn all_sent(&self) -> bool {
        self.buyer_sent && self.operator_sent
    }
}

/// Dispatches booking confirmations
#[derive(Clone)]
pub struct CompletionNotifier {
    mailer: Arc<dyn Mailer>,
    catalog: Arc<PackageCatalog>,
    operator_email: String,
}

impl CompletionNotifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        catalog: Arc<PackageCatalog>,
        operator_email: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            catalog,
            operator_email: operator_email.into(),
        }
    }

    pub fn operator_email(&self) -> &str {
        &self.operator_email
    }

    /// Send the buyer copy, then the operator copy
    pub async fn notify(&self, purchase: &CompletedPurchase) -> NotificationReport {
        let confirmation = Confirmation::from_purchase(purchase, &self.catalog);

        let buyer_sent = self
            .dispatch(&confirmation, Recipient::Buyer, &purchase.intent.buyer_email, purchase)
            .await;
        let operator_sent = self
            .dispatch(&confirmation, Recipient::Operator, &self.operator_email, purchase)
            .await;

        NotificationReport {
            buyer_sent,
            operator_sent,
        }
    }

    async fn dispatch(
        &self,
        confirmation: &Confirmation,
        recipient: Recipient,
        to: &str,
        purchase: &CompletedPurchase,
    ) -> bool {
        let email = confirmation.render(recipient, to);
        match self.mailer.send(&email).await {
            Ok(()) => {
                tracing::info!(
                    to = %to,
                    recipient = ?recipient,
                    session_id = %purchase.session_id,
                    "Confirmation email sent"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    to = %to,
                    recipient = ?recipient,
                    session_id = %purchase.session_id,
                    mailer = self.mailer.name(),
                    error = %e,
                    "Error sending confirmation email"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryMailer;
    use coaching_payments::PurchaseIntent;

    fn purchase() -> CompletedPurchase {
        CompletedPurchase {
            session_id: "cs_test_1".into(),
            intent: PurchaseIntent {
                buyer_email: "a@b.com".into(),
                in_game_name: "Foo".into(),
                discord_handle: "Foo#1".into(),
                package_id: "option3".into(),
                amount_cents: 5000,
            },
            amount_charged_cents: 5000,
            currency: Some("aud".into()),
        }
    }

    fn notifier(mailer: Arc<MemoryMailer>) -> CompletionNotifier {
        CompletionNotifier::new(mailer, Arc::new(PackageCatalog::default_menu()), "ops@example.com")
    }

    #[tokio::test]
    async fn test_two_dispatches() {
        let mailer = Arc::new(MemoryMailer::new());
        let report = notifier(mailer.clone()).notify(&purchase()).await;

        assert!(report.all_sent());
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[1].to, "ops@example.com");
        assert!(sent.iter().all(|m| m.html.contains("$50.00 AUD")));
    }

    #[tokio::test]
    async fn test_buyer_failure_does_not_block_operator() {
        let mailer = Arc::new(MemoryMailer::new().rejecting("a@b.com"));
        let report = notifier(mailer.clone()).notify(&purchase()).await;

        assert!(!report.buyer_sent);
        assert!(report.operator_sent);
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.com");
    }

    #[tokio::test]
    async fn test_operator_failure_does_not_block_buyer() {
        let mailer = Arc::new(MemoryMailer::new().rejecting("ops@example.com"));
        let report = notifier(mailer.clone()).notify(&purchase()).await;

        assert!(report.buyer_sent);
        assert!(!report.operator_sent);
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
    }
}
