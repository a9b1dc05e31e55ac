//! Delete Customer Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_app::domain::customers::records::CustomerId;

use crate::{customers::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerDeletedResponse {
    pub message: String,
}

/// Delete Customer Handler
///
/// Deletes the customer and all of its accounts.
#[endpoint(
    tags("customers"),
    summary = "Delete Customer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Customer deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Customer not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<CustomerDeletedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let subject = depot.subject_or_401()?;
    let customer = CustomerId::from_i64(id.into_inner());

    state
        .app
        .customers
        .delete_customer(customer)
        .await
        .map_err(into_status_error)?;

    info!(%customer, by = %subject.subject, "customer deleted");

    Ok(Json(CustomerDeletedResponse {
        message: "Customer deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use tally_app::domain::StoreError;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("customers/{id}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_customer_success() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .customers
            .expect_delete_customer()
            .once()
            .withf(|id| *id == CustomerId::from_i64(5))
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete("http://example.com/customers/5")
            .send(&make_service(mocks))
            .await;

        let body: CustomerDeletedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Customer deleted successfully");

        Ok(())
    }

    #[tokio::test]
    async fn test_second_delete_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .customers
            .expect_delete_customer()
            .once()
            .return_once(|_| Err(StoreError::NotFound));

        let res = TestClient::delete("http://example.com/customers/5")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_invalid_id_returns_400() -> TestResult {
        let res = TestClient::delete("http://example.com/customers/five")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
