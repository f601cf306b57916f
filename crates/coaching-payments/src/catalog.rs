//! Package Catalog
//!
//! The fixed coaching menu. Built once at startup and shared read-only.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable coaching package
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Identifier sent by the booking form (e.g. "option3")
    pub id: String,

    /// Human-readable description, used as the checkout line item name
    pub description: String,

    /// Price in the smallest currency unit
    pub price_cents: i64,
}

impl Package {
    pub fn new(id: impl Into<String>, description: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            price_cents,
        }
    }
}

/// Immutable mapping of package id to package
#[derive(Clone, Debug)]
pub struct PackageCatalog {
    packages: BTreeMap<String, Package>,
    currency: String,
    product_line: String,
}

impl Default for PackageCatalog {
    fn default() -> Self {
        Self::default_menu()
    }
}

impl PackageCatalog {
    /// Build a catalog from packages priced in `currency` (ISO code, any case)
    pub fn new(currency: &str, packages: impl IntoIterator<Item = Package>) -> Self {
        Self {
            packages: packages.into_iter().map(|p| (p.id.clone(), p)).collect(),
            currency: currency.to_lowercase(),
            product_line: "1-on-1 Coaching Session".into(),
        }
    }

    /// The standard coaching menu, priced in AUD
    pub fn default_menu() -> Self {
        Self::new(
            "aud",
            [
                Package::new("option1", "Option 1: $70 AUD - 90 minutes", 7000),
                Package::new("option2", "Option 2: $70 AUD - 90 minutes", 7000),
                Package::new("option3", "Option 3: $50 AUD - 60 minutes", 5000),
            ],
        )
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Lowercase ISO currency code shared by every package
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Secondary description shown under every line item
    pub fn product_line(&self) -> &str {
        &self.product_line
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Render minor units with exactly two decimal places ("5000" -> "50.00")
pub fn format_cents(cents: i64) -> String {
    Decimal::new(cents, 2).to_string()
}
