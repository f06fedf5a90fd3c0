//! Integration tests for Zhunan CRM.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zhunan-crm-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `registry` - Customer registry behaviour end to end
//! - `session` - Session store over both credential backends
//! - `http_api` - The admin API driven through the router
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`; no
//! server or network is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tower::ServiceExt;

use zhunan_crm_admin::config::CrmConfig;
use zhunan_crm_admin::db::MemoryCredentialStore;
use zhunan_crm_admin::routes;
use zhunan_crm_admin::seed::sample_registry;
use zhunan_crm_admin::services::auth::SessionStore;
use zhunan_crm_admin::state::AppState;

/// Seed used for reproducible sample data.
pub const TEST_SEED: u64 = 20_240_101;

/// An in-process admin app plus a handle on its state.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// App with `customers` seeded sample customers and the default accounts.
    ///
    /// # Panics
    ///
    /// Panics if the sample customers or default accounts cannot be seeded.
    #[must_use]
    pub fn new(customers: usize) -> Self {
        let registry = sample_registry(customers, &mut StdRng::seed_from_u64(TEST_SEED))
            .expect("seed sample customers");
        let session = SessionStore::with_default_users(Box::new(MemoryCredentialStore::new()))
            .expect("seed default accounts");
        let state = AppState::new(CrmConfig::default(), registry, session);
        let router = routes::app(state.clone());
        Self { state, router }
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails to produce a response.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Sign in with `email` and `password`, returning the response status.
    pub async fn login(&self, email: &str, password: &str) -> StatusCode {
        self.send(json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .status()
    }
}

/// Build a JSON request.
///
/// # Panics
///
/// Panics if `method` or `uri` is invalid.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Build a request without a body.
///
/// # Panics
///
/// Panics if `method` or `uri` is invalid.
#[must_use]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
