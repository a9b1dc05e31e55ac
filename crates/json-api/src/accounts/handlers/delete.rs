//! Delete Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_app::domain::accounts::records::AccountId;

use crate::{accounts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountDeletedResponse {
    pub message: String,
}

/// Delete Account Handler
#[endpoint(
    tags("accounts"),
    summary = "Delete Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<AccountDeletedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let subject = depot.subject_or_401()?;
    let account = AccountId::from_i64(id.into_inner());

    state
        .app
        .accounts
        .delete_account(account)
        .await
        .map_err(into_status_error)?;

    info!(%account, by = %subject.subject, "account deleted");

    Ok(Json(AccountDeletedResponse {
        message: "Account deleted successfully".to_string(),
    }))
}
