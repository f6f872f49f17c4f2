//! Address book route handlers.
//!
//! Addresses live behind the backend GraphQL API; the storefront only
//! caches the shopper's "selected address" pointer in the session. The
//! sole client-side validation is that an address must be selected before
//! a delivery order can be submitted (enforced at checkout).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::types::AddressId;

use crate::backend::types::Address;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::session as session_state;
use crate::state::AppState;

/// Create/update request body.
#[derive(Debug, Deserialize)]
pub struct AddressBody {
    /// Free-text address line.
    pub address: String,
}

/// List the user's saved addresses.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Address>>> {
    let addresses = state.backend().list_addresses(&user_id).await?;
    Ok(Json(addresses))
}

/// Create a new address.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<AddressBody>,
) -> Result<Json<Address>> {
    let address = state
        .backend()
        .create_address(&user_id, body.address)
        .await?;
    Ok(Json(address))
}

/// Update an existing address.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressBody>,
) -> Result<Json<Address>> {
    let address = state.backend().update_address(&id, body.address).await?;
    Ok(Json(address))
}

/// Delete an address.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<serde_json::Value>> {
    state.backend().delete_address(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Mark an address as the user's primary.
#[instrument(skip(state))]
pub async fn set_primary(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>> {
    let address = state.backend().set_primary_address(&id).await?;
    Ok(Json(address))
}

/// Select an address for the current checkout.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>> {
    // Only addresses the user actually owns can be selected
    let address = state
        .backend()
        .list_addresses(&user_id)
        .await?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("Address not found: {id}")))?;

    session_state::select_address(&session, id).await?;
    Ok(Json(address))
}
