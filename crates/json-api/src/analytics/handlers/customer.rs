//! Customer Analytics Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tally_app::domain::{analytics::records::CustomerStats, customers::records::CustomerId};

use crate::{analytics::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerStatsResponse {
    pub customer_id: i64,
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub inactive_accounts: i64,
}

impl From<CustomerStats> for CustomerStatsResponse {
    fn from(stats: CustomerStats) -> Self {
        CustomerStatsResponse {
            customer_id: stats.customer_id.into_i64(),
            total_accounts: stats.total_accounts,
            active_accounts: stats.active_accounts,
            inactive_accounts: stats.inactive_accounts,
        }
    }
}

/// Customer Analytics Handler
///
/// Unknown customers report zero counts.
#[endpoint(
    tags("analytics"),
    summary = "Customer Analytics",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    customer_id: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<CustomerStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .analytics
        .customer_stats(CustomerId::from_i64(customer_id.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}
