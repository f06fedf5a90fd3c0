//! Authentication route handlers for admin.
//!
//! Login, logout, registration and password changes against the single
//! process-wide session. Every body comes back as `{ success, message }`,
//! with the signed-in user added on login.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use zhunan_crm_core::CurrentUser;
use zhunan_crm_core::validation::{ValidationError, validate_email, validate_password};

use crate::error::AppError;
use crate::middleware::{AppJson, OptionalAuth, RequireAuth};
use crate::services::auth::{AuthOutcome, LOGGED_OUT_MESSAGE};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/auth/password", post(change_password))
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

/// Registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
    pub name: String,
}

/// Password change form.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(deserialize_with = "secret")]
    pub current_password: SecretString,
    #[serde(deserialize_with = "secret")]
    pub new_password: SecretString,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub outcome: AuthOutcome,
    pub user: CurrentUser,
}

/// Sign in.
///
/// POST /api/auth/login
#[instrument(skip(state, body), fields(email = %body.email))]
async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_email(&body.email)?;
    if body.password.expose_secret().is_empty() {
        return Err(ValidationError::PasswordRequired.into());
    }

    let success = state
        .session()
        .lock()
        .await
        .login(&body.email, body.password.expose_secret())?;

    Ok(Json(LoginResponse {
        outcome: AuthOutcome::ok(success.message),
        user: success.user,
    }))
}

/// Sign out. Succeeds whether or not anyone was signed in.
///
/// POST /api/auth/logout
async fn logout(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
) -> Json<AuthOutcome> {
    state.session().lock().await.logout();
    if let Some(user) = user {
        tracing::info!(email = %user.email, "User signed out");
    }
    Json(AuthOutcome::ok(LOGGED_OUT_MESSAGE))
}

/// Create a `user`-role account.
///
/// POST /api/auth/register
#[instrument(skip(state, body), fields(email = %body.email))]
async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<Json<AuthOutcome>, AppError> {
    let mut errors = Vec::new();
    if body.name.trim().is_empty() {
        errors.push(ValidationError::NameRequired);
    }
    if let Err(e) = validate_email(&body.email) {
        errors.push(e);
    }
    if let Err(e) = validate_password(body.password.expose_secret()) {
        errors.push(e);
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let message = state.session().lock().await.register(
        &body.email,
        body.password.expose_secret(),
        body.name.trim(),
    )?;

    Ok(Json(AuthOutcome::ok(message)))
}

/// The signed-in user.
///
/// GET /api/auth/me
async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// Change the signed-in user's password.
///
/// POST /api/auth/password
#[instrument(skip_all, fields(email = %user.email))]
async fn change_password(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppJson(body): AppJson<ChangePasswordRequest>,
) -> Result<Json<AuthOutcome>, AppError> {
    validate_password(body.new_password.expose_secret())?;

    let message = state.session().lock().await.change_password(
        user.email.as_str(),
        body.current_password.expose_secret(),
        body.new_password.expose_secret(),
    )?;

    Ok(Json(AuthOutcome::ok(message)))
}
