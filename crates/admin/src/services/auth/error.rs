//! Session store error types.

use thiserror::Error;

use crate::db::CredentialStoreError;

/// Message shown when a failure has no user-facing wording of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "系統發生錯誤，請稍後再試";

/// Errors that can occur during login, registration and password changes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password at login.
    #[error("電子郵件帳號或密碼錯誤")]
    InvalidCredentials,

    /// Registration with an email that is already in the credential map.
    #[error("此電子郵件已被註冊")]
    UserAlreadyExists,

    /// Password change for an email that is not in the credential map.
    #[error("找不到此用戶")]
    UserNotFound,

    /// Password change with a wrong current password.
    #[error("目前密碼錯誤")]
    WrongPassword,

    /// Registration with a structurally invalid email.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] zhunan_crm_core::EmailError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Credential map could not be read or written.
    #[error("credential storage error: {0}")]
    Storage(#[from] CredentialStoreError),
}

impl AuthError {
    /// The zh-TW message to show the person at the form.
    ///
    /// Internal failures collapse to a generic message; their details belong
    /// in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials
            | Self::UserAlreadyExists
            | Self::UserNotFound
            | Self::WrongPassword => self.to_string(),
            Self::InvalidEmail(_) => "請輸入有效的電子郵件地址".to_string(),
            Self::PasswordHash | Self::Storage(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns true for failures caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::PasswordHash | Self::Storage(_))
    }
}
