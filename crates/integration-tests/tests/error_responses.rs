//! HTTP error surface: status codes and JSON bodies for the failure modes
//! a checkout client has to distinguish.

use axum::http::StatusCode;
use axum::response::IntoResponse;

use greenbasket_core::order::OrderValidationError;
use greenbasket_storefront::backend::{BackendError, GraphQLError};
use greenbasket_storefront::error::AppError;
use greenbasket_storefront::services::payments::PaymentError;

async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

// =============================================================================
// Client-Side Validation
// =============================================================================

#[tokio::test]
async fn test_empty_cart_is_a_bad_request() {
    let (status, body) = response_parts(AppError::Validation(OrderValidationError::EmptyCart)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "cart is empty");
    assert!(body.get("payment_captured").is_none());
}

#[tokio::test]
async fn test_missing_address_is_a_bad_request() {
    let (status, body) = response_parts(AppError::Validation(OrderValidationError::NoAddress)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no delivery address selected");
}

// =============================================================================
// Payment Failures
// =============================================================================

#[tokio::test]
async fn test_declined_card_is_payment_required() {
    let (status, body) = response_parts(AppError::Payment(PaymentError::Declined(
        "insufficient funds".to_owned(),
    )))
    .await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["message"], "Payment declined: insufficient funds");
    // Nothing was captured; the client may retry
    assert!(body.get("payment_captured").is_none());
}

#[tokio::test]
async fn test_captured_payment_with_failed_order_warns_against_retry() {
    let (status, body) = response_parts(AppError::PaymentCapturedOrderFailed(
        BackendError::GraphQL(vec![GraphQLError {
            message: "order service unavailable".to_owned(),
            path: vec!["orderCreate".to_owned()],
        }]),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["payment_captured"], true);
    let message = body["message"].as_str().expect("message string");
    assert!(message.contains("contact support"));
    assert!(message.contains("do not retry the payment"));
}

// =============================================================================
// Backend Failures
// =============================================================================

#[tokio::test]
async fn test_backend_user_error_is_unprocessable() {
    let (status, body) =
        response_parts(AppError::Backend(BackendError::UserError("out of stock".to_owned()))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    // User errors pass through verbatim; they are written for shoppers
    assert_eq!(body["message"], "out of stock");
}

#[tokio::test]
async fn test_backend_rate_limit_maps_to_429() {
    let (status, _body) = response_parts(AppError::Backend(BackendError::RateLimited(30))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) =
        response_parts(AppError::Internal("session store exploded".to_owned())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}
