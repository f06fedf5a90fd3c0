//! Credential file management commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a store manager
//! crm-cli users add -e manager@example.com -n "店長" -p Manager123 -r admin
//!
//! # List accounts
//! crm-cli users list
//!
//! # Change a password
//! crm-cli users passwd -e bacon@example.com --current Bacon123 --new Bacon456
//! ```
//!
//! # Environment Variables
//!
//! - `CRM_CREDENTIALS_FILE` - credential file used when `--file` is not given

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use zhunan_crm_admin::db::{CredentialMap, JsonFileCredentialStore};
use zhunan_crm_admin::services::auth::{AuthError, SessionStore};
use zhunan_crm_core::UserRole;
use zhunan_crm_core::validation::{ValidationError, validate_email, validate_password};

/// Errors that can occur during account management.
#[derive(Debug, Error)]
pub enum UsersError {
    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, user")]
    InvalidRole(String),

    /// Email or password rejected by the form rules.
    #[error("{field}: {source}")]
    Validation {
        field: &'static str,
        #[source]
        source: ValidationError,
    },

    /// Session store rejected the operation.
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),

    /// Writing the listing failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for UsersError {
    fn from(source: ValidationError) -> Self {
        Self::Validation {
            field: source.field(),
            source,
        }
    }
}

fn open(file: &Path) -> Result<SessionStore, UsersError> {
    tracing::debug!(path = %file.display(), "Opening credential file");
    Ok(SessionStore::with_default_users(Box::new(
        JsonFileCredentialStore::new(file),
    ))?)
}

/// Add an account to the credential file.
///
/// # Errors
///
/// Returns an error if the role, email or password is invalid, the email is
/// taken, or the file cannot be updated.
pub fn add(
    file: &Path,
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> Result<(), UsersError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| UsersError::InvalidRole(role.to_owned()))?;
    validate_email(email)?;
    validate_password(password)?;
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired.into());
    }

    let mut session = open(file)?;
    session.add_account(email, password, name.trim(), role)?;

    tracing::info!("Added {} ({})", email, role);
    Ok(())
}

/// All accounts in the credential file, seeding the defaults into a new file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn entries(file: &Path) -> Result<CredentialMap, UsersError> {
    let session = open(file)?;
    Ok(session.credentials().entries().map_err(AuthError::from)?)
}

/// Write the account list to `out`, one tab-separated line per account.
///
/// # Errors
///
/// Returns an error if the file cannot be read or `out` cannot be written.
pub fn list(file: &Path, out: &mut impl Write) -> Result<(), UsersError> {
    for (email, entry) in entries(file)? {
        writeln!(out, "{email}\t{}\t{}", entry.name, entry.role)?;
    }
    Ok(())
}

/// Change an account's password.
///
/// # Errors
///
/// Returns an error if the account is unknown, the current password is wrong,
/// the new password is too weak, or the file cannot be updated.
pub fn passwd(file: &Path, email: &str, current: &str, new: &str) -> Result<(), UsersError> {
    validate_password(new)?;

    let mut session = open(file)?;
    let message = session.change_password(email, current, new)?;

    tracing::info!("{message}: {email}");
    Ok(())
}
