//! Water purifier and consumable reminder route handlers.
//!
//! Purifiers hang off a customer; every route checks that the customer
//! exists first. All routes require a signed-in user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use zhunan_crm_core::validation::validate_new_purifier;
use zhunan_crm_core::{ConsumableReplacement, CustomerId, NewPurifier, WaterPurifier};

use super::customers::not_found;
use crate::error::AppError;
use crate::middleware::{AppJson, AppPath, AppQuery, RequireAuth};
use crate::services::purifiers::ReplacementDue;
use crate::state::AppState;

/// Build the purifiers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers/{id}/purifiers", get(index).post(create))
        .route(
            "/api/customers/{id}/purifiers/{serial}/replacements",
            post(record_replacement),
        )
        .route("/api/notifications/consumables", get(due_consumables))
}

/// Reminder window query parameters.
#[derive(Debug, Deserialize)]
pub struct DueQuery {
    /// Days ahead of today to include; defaults to `CRM_REMINDER_DAYS`.
    pub within_days: Option<u32>,
}

/// Purifiers installed at a customer.
///
/// GET /api/customers/{id}/purifiers
async fn index(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CustomerId>,
) -> Result<Json<Vec<WaterPurifier>>, AppError> {
    let customers = state.customers().read().await;
    if customers.get(id).is_none() {
        return Err(not_found());
    }
    let purifiers = state.purifiers().read().await.for_customer(id).to_vec();
    Ok(Json(purifiers))
}

/// Install a purifier at a customer.
///
/// POST /api/customers/{id}/purifiers
#[instrument(skip_all, fields(customer = %id, by = %user.email))]
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CustomerId>,
    AppJson(body): AppJson<NewPurifier>,
) -> Result<(StatusCode, Json<WaterPurifier>), AppError> {
    validate_new_purifier(&body)?;

    let customers = state.customers().read().await;
    if customers.get(id).is_none() {
        return Err(not_found());
    }
    let purifier = state.purifiers().write().await.install(id, body)?;
    tracing::info!(serial = %purifier.serial_number, "Purifier installed");

    Ok((StatusCode::CREATED, Json(purifier)))
}

/// Record a consumable replacement visit.
///
/// POST /api/customers/{id}/purifiers/{serial}/replacements
#[instrument(skip_all, fields(customer = %id, serial = %serial, by = %user.email))]
async fn record_replacement(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath((id, serial)): AppPath<(CustomerId, String)>,
    AppJson(body): AppJson<ConsumableReplacement>,
) -> Result<Json<WaterPurifier>, AppError> {
    let customers = state.customers().read().await;
    if customers.get(id).is_none() {
        return Err(not_found());
    }
    let purifier = state
        .purifiers()
        .write()
        .await
        .record_replacement(id, &serial, body)?;
    tracing::info!("Replacement recorded");

    Ok(Json(purifier))
}

/// Consumables overdue or due within the reminder window, soonest first.
///
/// GET /api/notifications/consumables?within_days=
async fn due_consumables(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DueQuery>,
) -> Json<Vec<ReplacementDue>> {
    let within_days = query.within_days.unwrap_or(state.config().reminder_days);
    let today = Utc::now().date_naive();
    Json(
        state
            .purifiers()
            .read()
            .await
            .due_replacements(today, within_days),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Months, Utc};
    use serde_json::json;
    use tower::ServiceExt;

    use super::super::app;
    use super::super::test_support::{
        empty_request, json_request, read_json, sign_in_admin, state_with_customers,
    };

    fn install(serial: &str, date: &str) -> serde_json::Value {
        json!({
            "serial_number": serial,
            "model": "RO-500",
            "installation_date": date,
            "installation_person": "阿明",
            "location": "廚房",
        })
    }

    #[tokio::test]
    async fn test_purifier_routes_require_login() {
        let app = app(state_with_customers(1));
        for request in [
            empty_request("GET", "/api/customers/1/purifiers"),
            empty_request("GET", "/api/notifications/consumables"),
            json_request("POST", "/api/customers/1/purifiers", install("SN-1", "2024-01-15")),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_install_list_and_replace() {
        let app = app(state_with_customers(2));
        sign_in_admin(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers/2/purifiers",
                install("SN-1", "2024-01-15"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["consumables"].as_array().unwrap().len(), 8);
        assert_eq!(body["consumables"][0]["next_replacement_at"], "2024-07-15");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers/2/purifiers/SN-1/replacements",
                json!({ "items": ["filter_1"], "date": "2024-07-20", "notes": "定期保養" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["consumables"][0]["next_replacement_at"], "2025-01-20");
        assert_eq!(body["maintenance_records"][0]["notes"], "定期保養");

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/customers/2/purifiers"))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["maintenance_records"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(empty_request("GET", "/api/customers/1/purifiers"))
            .await
            .unwrap();
        assert!(read_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_errors() {
        let app = app(state_with_customers(2));
        sign_in_admin(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers/1/purifiers",
                json!({ "serial_number": "SN-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["message"], "請輸入型號");
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers/9/purifiers",
                install("SN-1", "2024-01-15"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "找不到此客戶");

        let first = json_request("POST", "/api/customers/1/purifiers", install("SN-1", "2024-01-15"));
        let response = app.clone().oneshot(first).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let again = json_request("POST", "/api/customers/2/purifiers", install("SN-1", "2024-02-01"));
        let response = app.clone().oneshot(again).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(read_json(response).await["message"], "此水機號碼已存在");

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/customers/2/purifiers/SN-1/replacements",
                json!({ "items": ["filter_1"], "date": "2024-07-20" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "找不到此淨水器");
    }

    #[tokio::test]
    async fn test_due_consumables_and_customer_removal() {
        let app = app(state_with_customers(1));
        sign_in_admin(&app).await;

        // Filters 1-3 fall due six months after installation: today.
        let installed = Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(6))
            .unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/customers/1/purifiers",
                install("SN-1", &installed.to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/notifications/consumables?within_days=0"))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["label"], "濾芯 1 號");
        assert_eq!(body[0]["customer_id"], 1);
        assert_eq!(body[0]["status"], "needs_replacement");

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/customers/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", "/api/notifications/consumables"))
            .await
            .unwrap();
        assert!(read_json(response).await.as_array().unwrap().is_empty());
    }
}
