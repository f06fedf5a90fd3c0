//! Session store.
//!
//! Holds at most one signed-in identity for the whole process and checks
//! login attempts against a [`CredentialStore`]. Passwords are kept as
//! Argon2id hashes.

mod error;

pub use error::{AuthError, GENERIC_FAILURE_MESSAGE};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use zhunan_crm_core::{CurrentUser, Email, UserRole};

use crate::db::{CredentialEntry, CredentialStore, CredentialStoreError};

/// An account the credential map is seeded with when it starts out empty.
#[derive(Debug, Clone, Copy)]
pub struct DefaultUser {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: UserRole,
}

/// Accounts present on a fresh install.
pub const DEFAULT_USERS: [DefaultUser; 2] = [
    DefaultUser {
        email: "admin@example.com",
        password: "Admin123",
        name: "Admin User",
        role: UserRole::Admin,
    },
    DefaultUser {
        email: "bacon@example.com",
        password: "Bacon123",
        name: "Bacon 堯",
        role: UserRole::User,
    },
];

/// Message returned by a successful registration.
pub const REGISTERED_MESSAGE: &str = "註冊成功！請登入。";
/// Message returned by a successful password change.
pub const PASSWORD_UPDATED_MESSAGE: &str = "密碼已更新";
/// Message returned by logout.
pub const LOGGED_OUT_MESSAGE: &str = "已登出";

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// The identity now held by the session.
    pub user: CurrentUser,
    /// Greeting for the signed-in user.
    pub message: String,
}

/// The `(success, message)` pair every session operation reduces to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

impl AuthOutcome {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<String, AuthError>> for AuthOutcome {
    fn from(result: Result<String, AuthError>) -> Self {
        match result {
            Ok(message) => Self::ok(message),
            Err(e) => Self::failed(e.user_message()),
        }
    }
}

impl From<Result<LoginSuccess, AuthError>> for AuthOutcome {
    fn from(result: Result<LoginSuccess, AuthError>) -> Self {
        result.map(|success| success.message).into()
    }
}

/// The process-wide session plus the credential map it checks against.
pub struct SessionStore {
    credentials: Box<dyn CredentialStore>,
    current: Option<CurrentUser>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a signed-out session over `credentials` as they are.
    #[must_use]
    pub fn new(credentials: Box<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            current: None,
        }
    }

    /// Create a signed-out session, seeding [`DEFAULT_USERS`] first if the
    /// credential map is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential map cannot be read or written.
    pub fn with_default_users(mut credentials: Box<dyn CredentialStore>) -> Result<Self, AuthError> {
        if credentials.is_empty()? {
            for user in DEFAULT_USERS {
                credentials.insert(
                    user.email,
                    CredentialEntry {
                        password_hash: hash_password(user.password)?,
                        name: user.name.to_string(),
                        role: user.role,
                    },
                )?;
            }
            tracing::info!(count = DEFAULT_USERS.len(), "Seeded default accounts");
        }
        Ok(Self::new(credentials))
    }

    /// Check `email` and `password` and make that account the current user.
    ///
    /// A failed attempt leaves any existing session in place.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
    /// password, or a storage error.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let entry = self
            .credentials
            .get(email)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &entry.password_hash)?;

        let user = CurrentUser {
            email: Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?,
            name: entry.name,
            role: entry.role,
            logged_in_at: Utc::now(),
        };
        let message = format!("歡迎回來，{}！", user.name);

        tracing::info!(role = %user.role, "Login succeeded");
        self.current = Some(user.clone());

        Ok(LoginSuccess { user, message })
    }

    /// Clear the current session. Signing out while signed out is a no-op.
    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(email = %user.email, "Logged out");
        }
    }

    /// Returns true if someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        self.current.as_ref()
    }

    /// Add a `user`-role account. Does not sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken,
    /// `AuthError::InvalidEmail` for a structurally invalid email, or a
    /// storage error.
    #[instrument(skip(self, password))]
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<String, AuthError> {
        self.add_account(email, password, name, UserRole::User)?;
        Ok(REGISTERED_MESSAGE.to_string())
    }

    /// Add an account with an explicit role.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub fn add_account(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        if self.credentials.get(email.as_str())?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let entry = CredentialEntry {
            password_hash: hash_password(password)?,
            name: name.to_string(),
            role,
        };
        self.credentials
            .insert(email.as_str(), entry)
            .map_err(|e| match e {
                CredentialStoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Storage(other),
            })?;

        tracing::info!(%role, "Account registered");
        Ok(())
    }

    /// Replace the password of `email` after checking `current_password`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for an unknown email,
    /// `AuthError::WrongPassword` if `current_password` does not match, or a
    /// storage error.
    #[instrument(skip(self, current_password, new_password))]
    pub fn change_password(
        &mut self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let entry = self
            .credentials
            .get(email)?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(current_password, &entry.password_hash)
            .map_err(|_| AuthError::WrongPassword)?;

        self.credentials
            .set_password_hash(email, hash_password(new_password)?)
            .map_err(|e| match e {
                CredentialStoreError::NotFound(_) => AuthError::UserNotFound,
                other => AuthError::Storage(other),
            })?;

        tracing::info!("Password changed");
        Ok(PASSWORD_UPDATED_MESSAGE.to_string())
    }

    /// The credential map this session checks against.
    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unreadable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
