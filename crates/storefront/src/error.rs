//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::payments::PaymentError;
use greenbasket_core::order::OrderValidationError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Marketplace backend API operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Payment capture failed before any order was created.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Payment was captured but order creation failed afterwards.
    ///
    /// Surfaced as its own case so the user is told NOT to retry payment:
    /// an automatic or manual re-submission of the payment would risk a
    /// double charge. The order failure is carried for diagnostics.
    #[error("Payment captured but order creation failed: {0}")]
    PaymentCapturedOrderFailed(#[source] BackendError),

    /// Checkout rejected client-side before any network call.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderValidationError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    /// Set only for the partial-success case so clients can render the
    /// "contact support" treatment instead of a retry button.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    payment_captured: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Backend(_) | Self::PaymentCapturedOrderFailed(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                BackendError::UserError(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Payment(err) => match err {
                PaymentError::Declined(_) => StatusCode::PAYMENT_REQUIRED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::PaymentCapturedOrderFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) | Self::Session(_) => "Internal server error".to_string(),
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => "Not found".to_string(),
                BackendError::UserError(msg) => msg.clone(),
                _ => "External service error".to_string(),
            },
            Self::Payment(err) => match err {
                PaymentError::Declined(msg) => format!("Payment declined: {msg}"),
                _ => "Payment service error".to_string(),
            },
            Self::PaymentCapturedOrderFailed(_) => {
                "Your payment was received but the order could not be created. \
                 Please contact support - do not retry the payment."
                    .to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        let body = ErrorBody {
            message,
            payment_captured: matches!(self, Self::PaymentCapturedOrderFailed(_)),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
