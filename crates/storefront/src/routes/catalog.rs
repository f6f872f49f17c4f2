//! Catalog route handlers: stores and products.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::types::StoreId;

use crate::backend::types::{Product, Store};
use crate::error::{AppError, Result};
use crate::models::session as session_state;
use crate::state::AppState;

/// List all stores in the marketplace.
#[instrument(skip(state))]
pub async fn stores(State(state): State<AppState>) -> Result<Json<Vec<Store>>> {
    let stores = state.backend().get_stores().await?;
    Ok(Json(stores))
}

/// Select-store request body.
#[derive(Debug, Deserialize)]
pub struct SelectStoreBody {
    pub store_id: StoreId,
}

/// Select the active store for this session.
///
/// Products are store-scoped, so switching stores clears the cart.
#[instrument(skip(state, session))]
pub async fn select_store(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SelectStoreBody>,
) -> Result<Json<Store>> {
    // Reject unknown stores before touching session state
    let store = state
        .backend()
        .get_stores()
        .await?
        .into_iter()
        .find(|s| s.id == body.store_id)
        .ok_or_else(|| AppError::NotFound(format!("Store not found: {}", body.store_id)))?;

    session_state::select_store(&session, body.store_id).await?;
    Ok(Json(store))
}

/// List the product catalog for the session's active store.
#[instrument(skip(state, session))]
pub async fn products(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Product>>> {
    let Some(store_id) = session_state::selected_store(&session).await? else {
        return Err(AppError::BadRequest("no store selected".to_string()));
    };

    let products = state.backend().get_products(&store_id).await?;
    Ok(Json(products))
}
