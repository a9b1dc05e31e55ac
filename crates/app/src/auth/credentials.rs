//! Password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::task::JoinError;

/// Password verified against when the username is unknown, so both paths
/// spend comparable time.
const DUMMY_PASSWORD: &str = "tally-unknown-user-placeholder";

static DUMMY_PASSWORD_HASH: OnceLock<Option<String>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("password hashing task failed")]
    Join(#[from] JoinError),
}

/// Produce a salted, self-describing argon2 hash of `password`.
///
/// # Errors
///
/// Returns an error when the hasher rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| CredentialError::Hash(error.to_string()))
}

/// Check `password` against a stored hash. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Run a verification that can never succeed.
pub(crate) fn verify_against_dummy(password: &str) {
    let dummy = DUMMY_PASSWORD_HASH.get_or_init(|| hash_password(DUMMY_PASSWORD).ok());

    if let Some(hash) = dummy {
        let _matched = verify_password(password, hash);
    }
}
