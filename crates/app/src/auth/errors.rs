//! Auth service errors.

use thiserror::Error;

use crate::{
    auth::{CredentialError, TokenError},
    domain::StoreError,
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid bearer token")]
    InvalidToken(#[source] TokenError),

    #[error("username already taken")]
    UsernameTaken,

    #[error("token issuance failed")]
    Issue(#[source] TokenError),

    #[error("credential processing error")]
    Credential(#[from] CredentialError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for AuthServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict => Self::UsernameTaken,
            StoreError::InvalidInput(reason) => Self::InvalidInput(reason),
            other => Self::Store(other),
        }
    }
}

impl From<sqlx::Error> for AuthServiceError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::from(error).into()
    }
}
