//! HTTP Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use coaching_payments::PaymentError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Failures surfaced to HTTP callers. Internal detail stays in the logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("request body could not be parsed")]
    InvalidBody,

    #[error("missing Stripe-Signature header")]
    MissingSignature,

    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Payment(PaymentError::Stripe(_) | PaymentError::Config(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Payment(_) | Self::InvalidBody | Self::MissingSignature => StatusCode::BAD_REQUEST,
            Self::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
        }
    }

    const fn message(&self) -> &'static str {
        match self {
            Self::Payment(e) => e.user_message(),
            Self::InvalidBody => "Invalid request body.",
            Self::MissingSignature => "Missing Stripe signature",
            Self::OriginNotAllowed(_) => "Not allowed by CORS",
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Payment(e) => e.code(),
            Self::InvalidBody => "INVALID_BODY",
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::OriginNotAllowed(_) => "ORIGIN_NOT_ALLOWED",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.message().into(),
                code: self.code().into(),
            }),
        )
            .into_response()
    }
}
