//! Global Analytics Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use tally_app::domain::analytics::records::GlobalStats;

use crate::{analytics::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GlobalStatsResponse {
    pub total_customers: i64,
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub inactive_accounts: i64,
    /// Mean account count over customers owning at least one account
    pub avg_accounts_per_customer: f64,
}

impl From<GlobalStats> for GlobalStatsResponse {
    fn from(stats: GlobalStats) -> Self {
        GlobalStatsResponse {
            total_customers: stats.total_customers,
            total_accounts: stats.total_accounts,
            active_accounts: stats.active_accounts,
            inactive_accounts: stats.inactive_accounts,
            avg_accounts_per_customer: stats.avg_accounts_per_customer,
        }
    }
}

/// Global Analytics Handler
///
/// Served from the analytics follower when one is configured.
#[endpoint(
    tags("analytics"),
    summary = "Global Analytics",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<GlobalStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .analytics
        .global_stats()
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}
