//! Update Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_app::domain::accounts::{data::AccountUpdate, records::AccountId};

use crate::{
    accounts::{errors::into_status_error, get::AccountResponse},
    extensions::*,
    state::State,
};

/// Update Account Request
///
/// The owning customer cannot be changed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateAccountRequest {
    pub name: String,
    pub status: String,
}

impl From<UpdateAccountRequest> for AccountUpdate {
    fn from(request: UpdateAccountRequest) -> Self {
        AccountUpdate {
            name: request.name,
            status: request.status,
        }
    }
}

/// Update Account Handler
#[endpoint(
    tags("accounts"),
    summary = "Update Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    json: JsonBody<UpdateAccountRequest>,
    depot: &mut Depot,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let subject = depot.subject_or_401()?;
    let account = AccountId::from_i64(id.into_inner());

    let updated = state
        .app
        .accounts
        .update_account(account, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(%account, by = %subject.subject, "account updated");

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use tally_app::domain::StoreError;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service};

    use super::{super::tests::make_account, *};

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("accounts/{id}").put(handler))
    }

    #[tokio::test]
    async fn test_update_account_success() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_update_account()
            .once()
            .withf(|id, update| {
                *id == AccountId::from_i64(4)
                    && *update
                        == AccountUpdate {
                            name: "Premium Account".to_string(),
                            status: "inactive".to_string(),
                        }
            })
            .return_once(|_, _| Ok(make_account(4, 1, "inactive")));

        let mut res = TestClient::put("http://example.com/accounts/4")
            .json(&json!({ "name": "Premium Account", "status": "inactive" }))
            .send(&make_service(mocks))
            .await;

        let body: AccountResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_blank_status_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_update_account()
            .once()
            .return_once(|_, _| Err(StoreError::InvalidInput("status is required")));

        let res = TestClient::put("http://example.com/accounts/4")
            .json(&json!({ "name": "Premium Account", "status": " " }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
