//! Login email addresses.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld`, as the login and customer forms accept it.
static EMAIL_FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

/// Input that is not a usable login email.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("not a valid email address: {0:?}")]
pub struct EmailError(String);

/// A login email: the key of the credential map and the identity of a session.
///
/// ```
/// use zhunan_crm_core::Email;
///
/// assert!(Email::parse("new@x.com").is_ok());
/// assert!(Email::parse("user@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Accept `s` if it has the form-level email shape.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` carrying the rejected input.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if Self::is_well_formed(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(EmailError(s.to_owned()))
        }
    }

    /// Returns true if `s` has the `local@domain.tld` shape.
    #[must_use]
    pub fn is_well_formed(s: &str) -> bool {
        EMAIL_FORMAT_RE.is_match(s)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
