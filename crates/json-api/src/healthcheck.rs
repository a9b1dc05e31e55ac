//! Tally JSON API Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use tally_app::health::HealthReport;

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` while the primary database answers
    pub status: String,

    /// Primary database connectivity
    pub database: String,

    /// Analytics follower connectivity, or `using primary`
    pub analytics_db: String,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        let status = if report.is_healthy() {
            "healthy"
        } else {
            "unhealthy"
        };

        HealthResponse {
            status: status.to_string(),
            database: report.database.as_str().to_string(),
            analytics_db: report.analytics_db.as_str().to_string(),
        }
    }
}

/// Healthcheck handler
///
/// Returns 503 when the primary database cannot be reached.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Primary database reachable"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Primary database unreachable"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let report = state.app.health.check().await;

    if !report.is_healthy() {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(report.into()))
}
