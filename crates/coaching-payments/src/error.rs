//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Why a purchase request was refused before reaching the provider
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A field was absent, null, empty or zero
    #[error("missing required fields")]
    MissingFields,

    /// Buyer email failed the syntactic check
    #[error("invalid email format")]
    InvalidEmail,

    /// Package id is not on the menu
    #[error("unknown package")]
    UnknownPackage,

    /// Submitted amount differs from the catalog price
    #[error("amount does not match catalog price")]
    AmountMismatch,
}

impl ValidationError {
    /// Machine-readable code returned to the caller
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::UnknownPackage | Self::AmountMismatch => "INVALID_OPTION",
        }
    }

    /// Message shown to the caller
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::MissingFields => "All fields are required.",
            Self::InvalidEmail => "Invalid email format.",
            Self::UnknownPackage | Self::AmountMismatch => "Invalid coaching option selected.",
        }
    }
}

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Purchase request rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(v) => v.user_message(),
            Self::Stripe(_) => "Internal server error. Please try again later.",
            Self::WebhookSignature(_) => "Invalid signature",
            Self::WebhookParse(_) => "Invalid webhook payload",
            Self::Config(_) => "Service configuration error.",
        }
    }

    /// Machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(v) => v.code(),
            Self::Stripe(_) => "CHECKOUT_ERROR",
            Self::WebhookSignature(_) => "INVALID_SIGNATURE",
            Self::WebhookParse(_) => "INVALID_PAYLOAD",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}
