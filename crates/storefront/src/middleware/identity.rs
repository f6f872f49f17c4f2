//! Current-user extraction.
//!
//! Identity is owned by the managed identity provider in front of this
//! service; by the time a request arrives the gateway has verified the
//! user and stamped `x-user-id`. This extractor takes that header on
//! trust - there is no local credential handling.

use axum::{extract::FromRequestParts, http::request::Parts};

use greenbasket_core::types::UserId;

use crate::error::AppError;

/// The HTTP header carrying the verified user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user's id.
///
/// Rejects with 400 when the header is missing or empty.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| Self(UserId::new(s)))
            .ok_or_else(|| AppError::BadRequest(format!("missing {USER_ID_HEADER} header")))
    }
}
