//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::{
    auth::{
        AuthServiceError, CredentialError, Credentials, IssuedToken, TokenClaims, TokenService,
        UserRecord,
        credentials::{hash_password, verify_against_dummy, verify_password},
        repository::PgUsersRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgUsersRepository,
    tokens: Arc<TokenService>,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, tokens: Arc<TokenService>) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            tokens,
        }
    }
}

fn require_fields(credentials: &Credentials) -> Result<String, AuthServiceError> {
    let username = credentials.username.trim();

    if username.is_empty() {
        return Err(AuthServiceError::InvalidInput("username is required"));
    }

    if credentials.password.is_empty() {
        return Err(AuthServiceError::InvalidInput("password is required"));
    }

    Ok(username.to_string())
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, credentials: Credentials) -> Result<UserRecord, AuthServiceError> {
        let username = require_fields(&credentials)?;
        let password = credentials.password;

        let password_hash = spawn_blocking(move || hash_password(&password))
            .await
            .map_err(CredentialError::from)??;

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_user(&mut tx, &username, &password_hash)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthServiceError> {
        let username = require_fields(&credentials)?;
        let password = credentials.password;

        let mut tx = self.db.begin().await?;

        let stored = self.repository.find_credentials(&mut tx, &username).await?;

        tx.commit().await?;

        let Some(stored) = stored else {
            spawn_blocking(move || verify_against_dummy(&password))
                .await
                .map_err(CredentialError::from)?;

            debug!("login rejected for unknown user");

            return Err(AuthServiceError::InvalidCredentials);
        };

        let password_hash = stored.password_hash;

        let valid = spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(CredentialError::from)?;

        if !valid {
            debug!("login rejected for wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        self.tokens
            .issue(&stored.username)
            .map_err(AuthServiceError::Issue)
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<TokenClaims, AuthServiceError> {
        self.tokens
            .validate(bearer_token)
            .map_err(AuthServiceError::InvalidToken)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user with a freshly hashed password.
    async fn register(&self, credentials: Credentials) -> Result<UserRecord, AuthServiceError>;

    /// Exchange valid credentials for a signed session token.
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthServiceError>;

    /// Validate a bearer token without touching storage.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<TokenClaims, AuthServiceError>;
}
