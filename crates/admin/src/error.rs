//! Unified error handling for admin.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use zhunan_crm_core::ValidationError;

use crate::services::auth::{AuthError, GENERIC_FAILURE_MESSAGE};
use crate::services::customers::RegistryError;
use crate::services::inventory::InventoryError;
use crate::services::purifiers::PurifierError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// The request clashes with a stored record.
    #[error("{0}")]
    Conflict(String),

    /// A form failed one or more field rules.
    #[error("{}", first_message(.0))]
    Validation(Vec<ValidationError>),

    /// Session store operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(vec![error])
    }
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<RegistryError> for AppError {
    fn from(error: RegistryError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<InventoryError> for AppError {
    fn from(error: InventoryError) -> Self {
        Self::NotFound(error.to_string())
    }
}

impl From<PurifierError> for AppError {
    fn from(error: PurifierError) -> Self {
        match error {
            PurifierError::NotFound(_) => Self::NotFound(error.to_string()),
            PurifierError::DuplicateSerial(_) => Self::Conflict(error.to_string()),
            PurifierError::Invalid(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        Self::BadRequest("請求內容格式錯誤".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected query string");
        Self::BadRequest("查詢參數格式錯誤".to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path parameter");
        Self::BadRequest("網址參數格式錯誤".to_string())
    }
}

fn first_message(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map_or_else(|| "輸入資料有誤".to_string(), ToString::to_string)
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::WrongPassword | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Auth(e) => e.user_message(),
            _ => self.to_string(),
        };

        let body = match &self {
            Self::Validation(errors) => json!({
                "success": false,
                "message": message,
                "errors": errors
                    .iter()
                    .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                    .collect::<Vec<_>>(),
            }),
            _ => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::CredentialStoreError;
    use zhunan_crm_core::{CustomerId, InventoryItemId};

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(PurifierError::DuplicateSerial("SN-1".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(PurifierError::NotFound("SN-1".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ValidationError::NameRequired.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RegistryError::IdsExhausted(CustomerId::new(i32::MAX)).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_auth_error_body_carries_user_message() {
        let (status, body) = body_json(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "電子郵件帳號或密碼錯誤");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let storage = CredentialStoreError::NotFound("admin@example.com".to_string());
        let (status, body) = body_json(AuthError::Storage(storage).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], GENERIC_FAILURE_MESSAGE);

        let exhausted = RegistryError::IdsExhausted(CustomerId::new(i32::MAX));
        let (_, body) = body_json(exhausted.into()).await;
        assert_eq!(body["message"], GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let err = AppError::Validation(vec![
            ValidationError::NameRequired,
            ValidationError::PhoneNotNumeric,
        ]);
        let (_, body) = body_json(err).await;
        assert_eq!(body["message"], "請輸入姓名");
        assert_eq!(body["errors"][1]["field"], "phone");
        assert_eq!(body["errors"][1]["message"], "電話號碼只能包含數字");
    }

    #[tokio::test]
    async fn test_domain_errors_keep_their_messages() {
        let (status, body) = body_json(InventoryError::NotFound(InventoryItemId::new(7)).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "庫存項目不存在");

        let invalid = PurifierError::Invalid(ValidationError::ReplacementItemsRequired);
        let (status, body) = body_json(invalid.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "items");
    }
}
