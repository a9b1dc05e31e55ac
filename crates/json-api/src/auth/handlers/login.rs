//! Login Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tally_app::auth::{Credentials, IssuedToken};

use crate::{auth::into_status_error, extensions::*, state::State};

const TOKEN_TYPE: &str = "Bearer";

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Session token for the `Authorization: Bearer` header
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: String,
    pub username: String,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        LoginResponse {
            token: issued.token,
            token_type: TOKEN_TYPE.to_string(),
            expires_at: issued.expires_at.to_string(),
            username: issued.subject,
        }
    }
}

/// Login Handler
///
/// Exchanges a username and password for a session token valid for 24 hours.
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Token issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid username or password"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let issued = state
        .app
        .auth
        .login(Credentials::new(request.username, request.password))
        .await
        .map_err(into_status_error)?;

    Ok(Json(issued.into()))
}
