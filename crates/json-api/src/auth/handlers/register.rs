//! Register Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_app::auth::{Credentials, UserRecord};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Register Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Registered user, without credential material
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            id: user.id.into_i64(),
            username: user.username,
            created_at: user.created_at.to_string(),
        }
    }
}

/// Register Handler
#[endpoint(
    tags("auth"),
    summary = "Register User",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::CONFLICT, description = "Username already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .auth
        .register(Credentials::new(request.username, request.password))
        .await
        .map_err(into_status_error)?;

    info!(user = %user.id, username = %user.username, "user registered");

    res.status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use tally_app::auth::{AuthServiceError, UserId};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, unauthenticated_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        unauthenticated_service(mocks, Router::with_path("auth/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_201_without_password() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_register()
            .once()
            .withf(|credentials| {
                credentials.username == "bob" && credentials.password.as_str() == "secret123"
            })
            .return_once(|_| {
                Ok(UserRecord {
                    id: UserId::from_i64(1),
                    username: "bob".to_string(),
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "username": "bob", "password": "secret123" }))
            .send(&make_service(mocks))
            .await;

        let body = res.take_string().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert!(body.contains(r#""username":"bob""#), "body was {body}");
        assert!(!body.contains("secret123"), "password leaked: {body}");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_taken_username_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::UsernameTaken));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "username": "bob", "password": "secret123" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_empty_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidInput("password is required")));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "username": "bob", "password": "" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
