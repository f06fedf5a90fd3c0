//! Customer route handlers.
//!
//! JSON CRUD over the customer registry. All routes require a signed-in user.
//! Removing a customer also drops their purifiers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use zhunan_crm_core::validation::{validate_customer_update, validate_new_customer};
use zhunan_crm_core::{Customer, CustomerId, CustomerUpdate, NewCustomer, Page};

use crate::error::AppError;
use crate::middleware::{AppJson, AppPath, AppQuery, RequireAuth};
use crate::state::AppState;

const CUSTOMER_NOT_FOUND_MESSAGE: &str = "找不到此客戶";

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(index).post(create))
        .route(
            "/api/customers/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number (default 1).
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Search term.
    pub q: Option<String>,
}

pub(crate) fn not_found() -> AppError {
    AppError::NotFound(CUSTOMER_NOT_FOUND_MESSAGE.to_string())
}

/// Paginated, searchable customer listing.
///
/// GET /api/customers?page=&page_size=&q=
#[instrument(skip_all, fields(page = ?query.page, q = ?query.q))]
async fn index(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Json<Page<Customer>> {
    let page = query.page.unwrap_or(1);
    let page_size = state.config().effective_page_size(query.page_size);
    let term = query.q.as_deref().map(str::trim);

    Json(state.customers().read().await.paginate(page, page_size, term))
}

/// Add a customer.
///
/// POST /api/customers
#[instrument(skip_all, fields(by = %user.email))]
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppJson(body): AppJson<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    validate_new_customer(&body)?;

    let customer = state.customers().write().await.add(body)?;
    tracing::info!(id = %customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Customer detail.
///
/// GET /api/customers/{id}
async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CustomerId>,
) -> Result<Json<Customer>, AppError> {
    state
        .customers()
        .read()
        .await
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

/// Partial update; fields left out of the body are unchanged.
///
/// PATCH /api/customers/{id}
#[instrument(skip_all, fields(id = %id, by = %user.email))]
async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CustomerId>,
    AppJson(body): AppJson<CustomerUpdate>,
) -> Result<Json<Customer>, AppError> {
    validate_customer_update(&body)?;

    let customer = state
        .customers()
        .write()
        .await
        .update(id, body)
        .ok_or_else(not_found)?;
    tracing::info!("Customer updated");

    Ok(Json(customer))
}

/// Remove a customer.
///
/// DELETE /api/customers/{id}
#[instrument(skip_all, fields(id = %id, by = %user.email))]
async fn destroy(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CustomerId>,
) -> Result<StatusCode, AppError> {
    let mut customers = state.customers().write().await;
    if !customers.delete(id) {
        return Err(not_found());
    }
    let purifiers = state.purifiers().write().await.remove_customer(id);
    drop(customers);
    tracing::info!(purifiers, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}
