//! Create Account Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_app::domain::{accounts::data::NewAccount, customers::records::CustomerId};

use crate::{
    accounts::{errors::into_status_error, get::AccountResponse},
    extensions::*,
    state::State,
};

/// Create Account Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAccountRequest {
    pub customer_id: i64,
    pub name: String,
    pub status: String,
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(request: CreateAccountRequest) -> Self {
        NewAccount {
            customer_id: CustomerId::from_i64(request.customer_id),
            name: request.name,
            status: request.status,
        }
    }
}

/// Create Account Handler
#[endpoint(
    tags("accounts"),
    summary = "Create Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid payload or unknown customer"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAccountRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let subject = depot.subject_or_401()?;

    let account = state
        .app
        .accounts
        .create_account(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(
        account = %account.id,
        customer = %account.customer_id,
        by = %subject.subject,
        "account created"
    );

    res.add_header(LOCATION, format!("/api/accounts/{}", account.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(account.into()))
}
