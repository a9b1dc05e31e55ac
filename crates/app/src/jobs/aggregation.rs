//! Daily data aggregation task.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    domain::analytics::AnalyticsService,
    jobs::{JobError, JobHandler, NewJob, Queue},
};

/// Kind string stored on aggregation jobs.
pub const AGGREGATE_DATA: &str = "aggregate:data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationPayload {
    pub date: Date,
}

/// Build an aggregation job for `date`.
///
/// # Errors
///
/// Returns an error when the payload cannot be serialized.
pub fn aggregation_job(date: Date, queue: Queue) -> Result<NewJob, serde_json::Error> {
    let payload = serde_json::to_value(AggregationPayload { date })?;

    Ok(NewJob::new(AGGREGATE_DATA, payload).on_queue(queue))
}

/// Today's date in UTC.
#[must_use]
pub fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

/// Reads the global counts and logs them. Running it twice for one date is harmless.
pub struct AggregationHandler {
    analytics: Arc<dyn AnalyticsService>,
}

impl AggregationHandler {
    #[must_use]
    pub fn new(analytics: Arc<dyn AnalyticsService>) -> Self {
        Self { analytics }
    }
}

impl std::fmt::Debug for AggregationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationHandler").finish_non_exhaustive()
    }
}

#[async_trait]
impl JobHandler for AggregationHandler {
    fn kind(&self) -> &'static str {
        AGGREGATE_DATA
    }

    async fn handle(&self, payload: &Value) -> Result<(), JobError> {
        let AggregationPayload { date } = AggregationPayload::deserialize(payload)?;

        info!(%date, "aggregating data");

        let stats = self.analytics.global_stats().await?;

        info!(
            %date,
            total_customers = stats.total_customers,
            total_accounts = stats.total_accounts,
            active_accounts = stats.active_accounts,
            inactive_accounts = stats.inactive_accounts,
            avg_accounts_per_customer = stats.avg_accounts_per_customer,
            "aggregation complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::{
        StoreError,
        analytics::{MockAnalyticsService, records::GlobalStats},
    };

    use super::*;

    #[test]
    fn job_payload_carries_iso_date() -> TestResult {
        let job = aggregation_job(Date::new(2026, 10, 18)?, Queue::Critical)?;

        assert_eq!(job.kind, AGGREGATE_DATA);
        assert_eq!(job.queue, Queue::Critical);
        assert_eq!(job.payload, json!({"date": "2026-10-18"}));

        Ok(())
    }

    #[tokio::test]
    async fn handler_reads_global_stats_each_run() -> TestResult {
        let mut analytics = MockAnalyticsService::new();

        analytics
            .expect_global_stats()
            .times(2)
            .returning(|| Ok(GlobalStats::default()));

        let handler = AggregationHandler::new(Arc::new(analytics));
        let payload = json!({"date": "2026-10-18"});

        handler.handle(&payload).await?;
        handler.handle(&payload).await?;

        Ok(())
    }

    #[tokio::test]
    async fn handler_rejects_payload_without_date() {
        let mut analytics = MockAnalyticsService::new();
        analytics.expect_global_stats().never();

        let handler = AggregationHandler::new(Arc::new(analytics));

        let result = handler.handle(&json!({"day": "monday"})).await;

        assert!(
            matches!(result, Err(JobError::Payload(_))),
            "expected Payload error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn handler_surfaces_store_failures() {
        let mut analytics = MockAnalyticsService::new();

        analytics
            .expect_global_stats()
            .once()
            .returning(|| Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut)));

        let handler = AggregationHandler::new(Arc::new(analytics));

        let result = handler.handle(&json!({"date": "2026-10-18"})).await;

        assert!(matches!(result, Err(JobError::Store(_))));
    }
}
