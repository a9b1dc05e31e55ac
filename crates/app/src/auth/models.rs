//! Auth data models.

use std::fmt;

use jiff::Timestamp;
use zeroize::Zeroizing;

use crate::ids::TypedId;

/// User Id
pub type UserId = TypedId<UserRecord>;

/// A registered user, without credential material.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub created_at: Timestamp,
}

/// Username and plaintext password submitted for registration or login.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Stored password verifier used during login.
#[derive(Clone)]
pub(crate) struct StoredCredentials {
    pub(crate) username: String,
    pub(crate) password_hash: String,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("bob", "hunter2"));

        assert!(rendered.contains("bob"), "username should be visible");
        assert!(!rendered.contains("hunter2"), "password must not be printed");
    }
}
