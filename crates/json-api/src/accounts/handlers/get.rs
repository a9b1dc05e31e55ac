//! Get Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tally_app::domain::accounts::records::{AccountId, AccountRecord};

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountResponse {
    /// The unique identifier of the account
    pub id: i64,

    /// Owning customer
    pub customer_id: i64,

    pub name: String,

    /// Free-form status, usually `active` or `inactive`
    pub status: String,

    pub created_at: String,

    pub updated_at: String,
}

impl From<AccountRecord> for AccountResponse {
    fn from(account: AccountRecord) -> Self {
        AccountResponse {
            id: account.id.into_i64(),
            customer_id: account.customer_id.into_i64(),
            name: account.name,
            status: account.status,
            created_at: account.created_at.to_string(),
            updated_at: account.updated_at.to_string(),
        }
    }
}

/// Get Account Handler
#[endpoint(
    tags("accounts"),
    summary = "Get Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account found"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let account = state
        .app
        .accounts
        .get_account(AccountId::from_i64(id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(account.into()))
}
