//! Signed session tokens.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroize;

/// How long an issued token stays valid.
pub const TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);

/// Number of random bytes in a generated signing secret.
pub const GENERATED_SECRET_BYTES: usize = 32;

/// Process-wide HMAC secret. Immutable once built.
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; GENERATED_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self { bytes }
    }

    /// Use the configured secret, or generate one when it is missing or empty.
    #[must_use]
    pub fn from_config(configured: Option<String>) -> Self {
        match configured.filter(|secret| !secret.is_empty()) {
            Some(secret) => Self::from_bytes(secret.into_bytes()),
            None => {
                warn!(
                    "JWT_SECRET is not set, using a generated secret; issued tokens will not survive a restart"
                );

                Self::generate()
            }
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token timestamps are out of range")]
    OutOfRange,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub subject: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Claims carried by a token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// HS256 token issuer and validator.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: SignedDuration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_ttl(secret, TOKEN_TTL)
    }

    #[must_use]
    pub fn with_ttl(secret: &SigningSecret, ttl: SignedDuration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for `subject` valid from now.
    ///
    /// # Errors
    ///
    /// Returns an error when the token cannot be signed.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Timestamp::now())
    }

    /// Sign a token for `subject` as if issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error when the expiry overflows or signing fails.
    pub fn issue_at(&self, subject: &str, now: Timestamp) -> Result<IssuedToken, TokenError> {
        let issued_at =
            Timestamp::from_second(now.as_second()).map_err(|_overflow| TokenError::OutOfRange)?;

        let expires_at = issued_at
            .checked_add(self.ttl)
            .map_err(|_overflow| TokenError::OutOfRange)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.as_second(),
            exp: expires_at.as_second(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Check signature and expiry against the current time.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is malformed, tampered with, or expired.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.validate_at(token, Timestamp::now())
    }

    /// Check signature and expiry against `now`.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is malformed, tampered with, or expired.
    pub fn validate_at(&self, token: &str, now: Timestamp) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);

        // expiry is compared against `now` below
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;

        let issued_at =
            Timestamp::from_second(claims.iat).map_err(|_invalid| TokenError::Malformed)?;
        let expires_at =
            Timestamp::from_second(claims.exp).map_err(|_invalid| TokenError::Malformed)?;

        if now > expires_at {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SigningSecret::from_bytes(b"test-secret".to_vec()))
    }

    #[test]
    fn issued_token_validates_with_same_subject() -> TestResult {
        let tokens = service();
        let issued = tokens.issue("bob")?;

        let claims = tokens.validate(&issued.token)?;

        assert_eq!(claims.subject, "bob");
        assert_eq!(claims.expires_at, issued.expires_at);

        Ok(())
    }

    #[test]
    fn expiry_is_twenty_four_hours_after_issue() -> TestResult {
        let now = Timestamp::from_second(1_700_000_000)?;
        let issued = service().issue_at("bob", now)?;

        assert_eq!(issued.issued_at, now);
        assert_eq!(issued.expires_at.as_second() - now.as_second(), 86_400);

        Ok(())
    }

    #[test]
    fn token_is_rejected_once_past_expiry() -> TestResult {
        let tokens = service();
        let now = Timestamp::from_second(1_700_000_000)?;
        let issued = tokens.issue_at("bob", now)?;

        let just_before = issued.expires_at.checked_sub(SignedDuration::from_secs(1))?;
        let just_after = issued.expires_at.checked_add(SignedDuration::from_secs(1))?;

        assert!(tokens.validate_at(&issued.token, just_before).is_ok());
        assert!(matches!(
            tokens.validate_at(&issued.token, just_after),
            Err(TokenError::Expired)
        ));

        Ok(())
    }

    #[test]
    fn tampered_signature_is_rejected() -> TestResult {
        let tokens = service();
        let issued = tokens.issue("bob")?;

        let (head, signature) = issued
            .token
            .rsplit_once('.')
            .ok_or("token should have a signature segment")?;

        let mut chars: Vec<char> = signature.chars().collect();
        let first = chars.first_mut().ok_or("signature should not be empty")?;
        *first = if *first == 'A' { 'B' } else { 'A' };

        let tampered = format!("{head}.{}", chars.into_iter().collect::<String>());

        assert!(matches!(
            tokens.validate(&tampered),
            Err(TokenError::InvalidSignature)
        ));

        Ok(())
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() -> TestResult {
        let other = TokenService::new(&SigningSecret::from_bytes(b"other".to_vec()));
        let issued = other.issue("bob")?;

        assert!(matches!(
            service().validate(&issued.token),
            Err(TokenError::InvalidSignature)
        ));

        Ok(())
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().validate("not.a.jwt"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(service().validate(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn empty_configured_secret_falls_back_to_generated() {
        let secret = SigningSecret::from_config(Some(String::new()));

        assert_eq!(secret.as_bytes().len(), GENERATED_SECRET_BYTES);
    }

    #[test]
    fn configured_secret_is_used_verbatim() {
        let secret = SigningSecret::from_config(Some("s3cret".to_string()));

        assert_eq!(secret.as_bytes(), b"s3cret");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let rendered = format!("{:?}", SigningSecret::from_bytes(b"s3cret".to_vec()));

        assert!(!rendered.contains("s3cret"));
    }
}
