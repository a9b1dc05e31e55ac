//! Account Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    accounts::{errors::into_status_error, get::AccountResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountsResponse {
    /// Accounts, newest first
    pub accounts: Vec<AccountResponse>,
}

/// Account Index Handler
#[endpoint(
    tags("accounts"),
    summary = "List Accounts",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AccountsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let accounts = state
        .app
        .accounts
        .list_accounts()
        .await
        .map_err(into_status_error)?;

    Ok(Json(AccountsResponse {
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}
