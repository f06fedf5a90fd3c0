//! Authentication extractors for admin.
//!
//! Provides extractors for requiring a signed-in user in route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use zhunan_crm_core::CurrentUser;

use crate::error::AppError;
use crate::state::AppState;

/// Message returned when a protected route is called while signed out.
pub const LOGIN_REQUIRED_MESSAGE: &str = "請先登入";

/// Extractor that requires a signed-in user.
///
/// Rejects with 401 Unauthorized while the session is empty. The extracted
/// identity is a snapshot taken when the request arrived.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .session()
            .lock()
            .await
            .current_user()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request while signed out.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().lock().await.current_user().cloned()))
    }
}
