//! Payments API client for card capture.
//!
//! The browser-side hosted SDK tokenizes the card; this client exchanges
//! that one-time token for a captured payment. The idempotency key travels
//! in the request body so a manual checkout retry reuses the same payment
//! instead of charging twice.

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use greenbasket_core::order::IdempotencyKey;
use greenbasket_core::types::money::to_minor_units;

use crate::config::PaymentsConfig;

/// Payments API version.
const API_VERSION: &str = "2024-06-04";

/// Errors that can occur when interacting with the payments API.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The card was declined.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The amount cannot be represented in minor units.
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    /// Failed to parse a response or build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A captured payment.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: String,
}

/// Payments API client.
#[derive(Clone)]
pub struct PaymentsClient {
    client: reqwest::Client,
    base_url: String,
    location_id: String,
}

#[derive(Debug, Serialize)]
struct CreatePaymentRequest<'a> {
    source_id: &'a str,
    idempotency_key: String,
    amount_money: AmountMoney,
    location_id: &'a str,
}

#[derive(Debug, Serialize)]
struct AmountMoney {
    /// Amount in minor units (cents).
    amount: i64,
    currency: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreatePaymentResponse {
    payment: Payment,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl PaymentsClient {
    /// Create a new payments API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.access_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| PaymentError::Parse(format!("Invalid access token format: {e}")))?,
        );
        headers.insert("Square-Version", HeaderValue::from_static(API_VERSION));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            location_id: config.location_id.clone(),
        })
    }

    /// Capture a payment from a tokenized card source.
    ///
    /// `amount` is in dollars and is converted to minor units. The
    /// idempotency key is scoped to the checkout attempt, so a retried
    /// checkout resolves to the same payment on the gateway side.
    ///
    /// # Errors
    ///
    /// Returns `Declined` when the gateway rejects the card, `Api` for
    /// other non-success responses.
    #[instrument(skip(self, source_token), fields(idempotency_key = %idempotency_key))]
    pub async fn create_payment(
        &self,
        source_token: &str,
        amount: Decimal,
        idempotency_key: IdempotencyKey,
    ) -> Result<Payment, PaymentError> {
        let cents = to_minor_units(amount).ok_or(PaymentError::InvalidAmount(amount))?;

        let url = format!("{}/v2/payments", self.base_url);
        let body = CreatePaymentRequest {
            source_id: source_token,
            idempotency_key: idempotency_key.to_string(),
            amount_money: AmountMoney {
                amount: cents,
                currency: "USD",
            },
            location_id: &self.location_id,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed: ApiErrorResponse = serde_json::from_str(&text).unwrap_or(ApiErrorResponse {
                errors: vec![],
            });

            // Card declines come back as a specific error code
            if let Some(declined) = parsed.errors.iter().find(|e| {
                matches!(
                    e.code.as_deref(),
                    Some("CARD_DECLINED" | "GENERIC_DECLINE" | "INSUFFICIENT_FUNDS" | "CVV_FAILURE")
                )
            }) {
                return Err(PaymentError::Declined(
                    declined
                        .detail
                        .clone()
                        .unwrap_or_else(|| "card declined".to_string()),
                ));
            }

            let message = parsed
                .errors
                .first()
                .and_then(|e| e.detail.clone())
                .unwrap_or(text);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CreatePaymentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        Ok(parsed.payment)
    }
}
