//! Customer Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    customers::{errors::into_status_error, get::CustomerResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomersResponse {
    /// Customers, newest first
    pub customers: Vec<CustomerResponse>,
}

/// Customer Index Handler
///
/// Returns every customer, newest first.
#[endpoint(
    tags("customers"),
    summary = "List Customers",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CustomersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let customers = state
        .app
        .customers
        .list_customers()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CustomersResponse {
        customers: customers.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use tally_app::domain::StoreError;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service};

    use super::{super::tests::make_customer, *};

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("customers").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_customers_in_service_order() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .customers
            .expect_list_customers()
            .once()
            .return_once(|| Ok(vec![make_customer(2), make_customer(1)]));

        let mut res = TestClient::get("http://example.com/customers")
            .send(&make_service(mocks))
            .await;

        let body: CustomersResponse = res.take_json().await?;
        let ids: Vec<i64> = body.customers.iter().map(|c| c.id).collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(ids, vec![2, 1]);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unavailable_store_returns_503() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .customers
            .expect_list_customers()
            .once()
            .return_once(|| Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/customers")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }
}
