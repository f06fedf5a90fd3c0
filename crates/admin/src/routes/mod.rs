//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//! GET    /api/info              - App name and version
//!
//! # Auth (single process-wide session)
//! POST   /api/auth/login        - Sign in
//! POST   /api/auth/logout       - Sign out
//! POST   /api/auth/register     - Create a `user` account
//! GET    /api/auth/me           - Current user
//! POST   /api/auth/password     - Change the current user's password
//!
//! # Customers (sign-in required)
//! GET    /api/customers         - Paginated, searchable listing
//! POST   /api/customers         - Add a customer
//! GET    /api/customers/{id}    - Customer detail
//! PATCH  /api/customers/{id}    - Partial update
//! DELETE /api/customers/{id}    - Remove a customer and their purifiers
//!
//! # Purifiers (sign-in required)
//! GET    /api/customers/{id}/purifiers                         - Installed purifiers
//! POST   /api/customers/{id}/purifiers                         - Install a purifier
//! POST   /api/customers/{id}/purifiers/{serial}/replacements   - Record a replacement
//! GET    /api/notifications/consumables                        - Due consumables
//!
//! # Inventory (sign-in required)
//! GET    /api/inventory         - Stock listing, `?q=` searches
//! GET    /api/inventory/{id}    - Stock item
//! PATCH  /api/inventory/{id}    - Set the stock count
//! ```
//!
//! Malformed bodies, paths and query strings are rejected with a JSON 400.

pub mod auth;
pub mod customers;
pub mod inventory;
pub mod purifiers;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Display name of the app.
pub const APP_NAME: &str = "共享竹南店-客戶管理系統";

/// Build the route table without state or layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/info", get(info))
        .merge(auth::router())
        .merge(customers::router())
        .merge(purifiers::router())
        .merge(inventory::router())
}

/// Build the complete application: routes, request tracing and state.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// App name and version.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
}

async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use zhunan_crm_core::{Customer, Gender, NewCustomer};

    use crate::config::CrmConfig;
    use crate::db::MemoryCredentialStore;
    use crate::services::auth::SessionStore;
    use crate::services::customers::CustomerRegistry;
    use crate::state::AppState;

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub async fn read_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// State with `count` customers named `客戶1`, `客戶2`, ...
    pub fn state_with_customers(count: usize) -> AppState {
        let mut registry = CustomerRegistry::new();
        for n in 1..=count {
            registry.add(NewCustomer {
                name: format!("客戶{n}"),
                gender: Gender::Female,
                phone: format!("09120000{n:02}"),
                address: "苗栗縣竹南鎮光復路1號".to_string(),
                member_id: None,
                email: Some(format!("user{n}@example.com")),
                line_id: None,
            })
            .unwrap();
        }
        let session =
            SessionStore::with_default_users(Box::new(MemoryCredentialStore::new())).unwrap();
        AppState::new(CrmConfig::default(), registry, session)
    }

    pub async fn sign_in_admin(app: &axum::Router) {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({ "email": "admin@example.com", "password": "Admin123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub fn customer_from(value: serde_json::Value) -> Customer {
        serde_json::from_value(value).unwrap()
    }
}
