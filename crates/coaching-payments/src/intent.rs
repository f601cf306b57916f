//! Purchase Intent
//!
//! What the booking form submits, and the validated form of it that travels
//! through the checkout session metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Package, PackageCatalog};
use crate::error::{PaymentError, Result, ValidationError};

const META_EMAIL: &str = "buyer_email";
const META_IGN: &str = "in_game_name";
const META_DISCORD: &str = "discord_handle";
const META_PACKAGE: &str = "package_id";
const META_AMOUNT: &str = "amount_cents";

/// Booking form body as received. Every field is optional so that absent
/// values surface as a validation error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default, alias = "email")]
    pub buyer_email: Option<String>,

    #[serde(default, alias = "ign")]
    pub in_game_name: Option<String>,

    #[serde(default, alias = "discord")]
    pub discord_handle: Option<String>,

    #[serde(default, alias = "coachingOption")]
    pub package_id: Option<String>,

    #[serde(default, alias = "amount")]
    pub amount_cents: Option<i64>,
}

/// A purchase that passed validation against the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseIntent {
    pub buyer_email: String,
    pub in_game_name: String,
    pub discord_handle: String,
    pub package_id: String,
    pub amount_cents: i64,
}

impl CheckoutForm {
    /// Validate against the catalog, returning the intent and its package
    pub fn validate<'c>(
        self,
        catalog: &'c PackageCatalog,
    ) -> std::result::Result<(PurchaseIntent, &'c Package), ValidationError> {
        let (Some(email), Some(ign), Some(discord), Some(package_id), Some(amount)) = (
            non_empty(self.buyer_email),
            non_empty(self.in_game_name),
            non_empty(self.discord_handle),
            non_empty(self.package_id),
            self.amount_cents.filter(|a| *a != 0),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let package = catalog
            .get(&package_id)
            .ok_or(ValidationError::UnknownPackage)?;
        if package.price_cents != amount {
            return Err(ValidationError::AmountMismatch);
        }

        Ok((
            PurchaseIntent {
                buyer_email: email,
                in_game_name: ign,
                discord_handle: discord,
                package_id,
                amount_cents: amount,
            },
            package,
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Basic syntactic check: `local@domain.tld`, no whitespace, a single `@`,
/// and a dot inside the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

impl PurchaseIntent {
    /// Flatten into checkout session metadata
    pub fn to_metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            (META_EMAIL.to_string(), self.buyer_email.clone()),
            (META_IGN.to_string(), self.in_game_name.clone()),
            (META_DISCORD.to_string(), self.discord_handle.clone()),
            (META_PACKAGE.to_string(), self.package_id.clone()),
            (META_AMOUNT.to_string(), self.amount_cents.to_string()),
        ])
    }

    /// Recover an intent echoed back in a completion event
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self> {
        let field = |key: &str| {
            metadata
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| PaymentError::WebhookParse(format!("metadata missing {key}")))
        };

        let amount = field(META_AMOUNT)?;
        let amount_cents = amount.parse().map_err(|_| {
            PaymentError::WebhookParse(format!("metadata {META_AMOUNT} is not a number: {amount}"))
        })?;

        Ok(Self {
            buyer_email: field(META_EMAIL)?,
            in_game_name: field(META_IGN)?,
            discord_handle: field(META_DISCORD)?,
            package_id: field(META_PACKAGE)?,
            amount_cents,
        })
    }
}
