//! Inventory route handlers.
//!
//! Stock listing, search and stock counts. All routes require a signed-in user.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use tracing::instrument;

use zhunan_crm_core::validation::validate_stock_quantity;
use zhunan_crm_core::{InventoryItem, InventoryItemId};

use crate::error::AppError;
use crate::middleware::{AppJson, AppPath, AppQuery, RequireAuth};
use crate::services::inventory::InventoryError;
use crate::state::AppState;

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inventory", get(index))
        .route("/api/inventory/{id}", get(show).patch(set_stock))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// Matched against name and item code, ignoring case.
    pub q: Option<String>,
}

/// Stock count form. Signed so that negative counts reach validation.
#[derive(Debug, Deserialize)]
pub struct StockSetForm {
    pub stock_quantity: i64,
}

/// Stock listing, optionally filtered.
///
/// GET /api/inventory?q=
async fn index(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<InventoryQuery>,
) -> Json<Vec<InventoryItem>> {
    let term = query.q.as_deref().map(str::trim);
    let inventory = state.inventory().read().await;
    Json(inventory.search(term).into_iter().cloned().collect())
}

/// One stock item.
///
/// GET /api/inventory/{id}
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<InventoryItemId>,
) -> Result<Json<InventoryItem>, AppError> {
    let inventory = state.inventory().read().await;
    let item = inventory.get(id).ok_or(InventoryError::NotFound(id))?;
    Ok(Json(item.clone()))
}

/// Set the counted stock of an item.
///
/// PATCH /api/inventory/{id}
#[instrument(skip_all, fields(id = %id, by = %user.email))]
async fn set_stock(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<InventoryItemId>,
    AppJson(form): AppJson<StockSetForm>,
) -> Result<Json<InventoryItem>, AppError> {
    let quantity = validate_stock_quantity(form.stock_quantity)?;

    let item = state.inventory().write().await.update_stock(id, quantity)?;
    tracing::info!(quantity, "Stock quantity updated");

    Ok(Json(item))
}
