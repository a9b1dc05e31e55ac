//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tally_app::auth::{AuthServiceError, TokenError};

use crate::{
    auth::into_status_error, extensions::*, observability::record_auth_rejection, state::State,
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        record_auth_rejection("missing_token");
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    match state.app.auth.authenticate_bearer(token).await {
        Ok(claims) => depot.insert_subject(claims),
        Err(error) => {
            if let Some(reason) = rejection_reason(&error) {
                record_auth_rejection(reason);
            }

            res.render(into_status_error(error));
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Metric label for token failures; other errors are not the caller's fault.
fn rejection_reason(error: &AuthServiceError) -> Option<&'static str> {
    match error {
        AuthServiceError::InvalidToken(TokenError::Expired) => Some("expired_token"),
        AuthServiceError::InvalidToken(_) => Some("invalid_token"),
        _ => None,
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use tally_app::auth::{SigningSecret, TokenClaims, TokenService};
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[salvo::handler]
    async fn echo_subject(depot: &mut Depot, res: &mut Response) {
        let subject = depot
            .subject_or_401()
            .map_or_else(|_missing| "missing".to_string(), |claims| claims.subject.clone());

        res.render(subject);
    }

    fn make_service(mocks: Mocks) -> Service {
        let router = Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(handler)
            .push(Router::new().get(echo_subject));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_token_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::InvalidToken(TokenError::Expired)));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_subject() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| {
                Ok(TokenClaims {
                    subject: "alice".to_string(),
                    issued_at: Timestamp::UNIX_EPOCH,
                    expires_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "alice");

        Ok(())
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected_by_real_validator() -> TestResult {
        let tokens = Arc::new(TokenService::new(&SigningSecret::from_bytes(
            b"middleware-test-secret".to_vec(),
        )));
        let issued = tokens.issue("bob")?;
        let tampered = format!("{}x", issued.token);

        let mut mocks = Mocks::default();
        let validator = Arc::clone(&tokens);

        mocks
            .auth
            .expect_authenticate_bearer()
            .times(2)
            .returning(move |token| {
                validator
                    .validate(token)
                    .map_err(AuthServiceError::InvalidToken)
            });

        let service = make_service(mocks);

        let mut accepted = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("Bearer {}", issued.token), true)
            .send(&service)
            .await;

        let rejected = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("Bearer {tampered}"), true)
            .send(&service)
            .await;

        assert_eq!(accepted.status_code, Some(StatusCode::OK));
        assert_eq!(accepted.take_string().await?, "bob");
        assert_eq!(rejected.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
