//! Confirmation Messages
//!
//! Renders the buyer and operator copies of a booking confirmation.

use coaching_payments::{format_cents, CompletedPurchase, PackageCatalog};

use crate::mailer::OutgoingEmail;

pub const CONFIRMATION_SUBJECT: &str = "Coaching Session Confirmation";

/// Who a confirmation copy is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Buyer,
    Operator,
}

/// Booking details shown in both copies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub buyer_email: String,
    pub in_game_name: String,
    pub discord_handle: String,
    pub package: String,
    /// e.g. "$50.00 AUD"
    pub amount_paid: String,
}

impl Confirmation {
    /// Describe a completed purchase, naming the package from the catalog
    /// when it is still on the menu.
    pub fn from_purchase(purchase: &CompletedPurchase, catalog: &PackageCatalog) -> Self {
        let intent = &purchase.intent;
        let package = catalog
            .get(&intent.package_id)
            .map_or_else(|| intent.package_id.clone(), |p| p.description.clone());
        let currency = purchase
            .currency
            .as_deref()
            .unwrap_or_else(|| catalog.currency())
            .to_uppercase();

        Self {
            buyer_email: intent.buyer_email.clone(),
            in_game_name: intent.in_game_name.clone(),
            discord_handle: intent.discord_handle.clone(),
            package,
            amount_paid: format!("${} {currency}", format_cents(purchase.amount_charged_cents)),
        }
    }

    /// Render the copy addressed to `to`
    pub fn render(&self, recipient: Recipient, to: &str) -> OutgoingEmail {
        let intro = match recipient {
            Recipient::Buyer => "<p>Thank you for booking a session with us!</p>",
            Recipient::Operator => "<p>New coaching session booked.</p>",
        };
        let outro = match recipient {
            Recipient::Buyer => "<p>Looking forward to the session!</p>",
            Recipient::Operator => "",
        };

        let html = format!(
            "<h1>{CONFIRMATION_SUBJECT}</h1>\n\
             {intro}\n\
             <h3>Details:</h3>\n\
             <ul>\n\
             <li><strong>Email:</strong> {}</li>\n\
             <li><strong>IGN:</strong> {}</li>\n\
             <li><strong>Discord:</strong> {}</li>\n\
             <li><strong>Coaching Option:</strong> {}</li>\n\
             <li><strong>Amount Paid:</strong> {}</li>\n\
             </ul>\n\
             {outro}",
            escape_html(&self.buyer_email),
            escape_html(&self.in_game_name),
            escape_html(&self.discord_handle),
            escape_html(&self.package),
            escape_html(&self.amount_paid),
        );

        OutgoingEmail {
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            html,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
