//! Analytics service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::ReadDb,
    domain::{
        StoreError,
        analytics::{
            records::{CustomerStats, GlobalStats},
            repository::PgAnalyticsRepository,
        },
        customers::records::CustomerId,
    },
};

/// Aggregate reads served by the analytics follower when one is connected.
#[derive(Debug, Clone)]
pub struct PgAnalyticsService {
    read: ReadDb,
    repository: PgAnalyticsRepository,
}

impl PgAnalyticsService {
    #[must_use]
    pub fn new(read: ReadDb) -> Self {
        Self {
            read,
            repository: PgAnalyticsRepository::new(),
        }
    }
}

#[async_trait]
impl AnalyticsService for PgAnalyticsService {
    async fn global_stats(&self) -> Result<GlobalStats, StoreError> {
        let mut tx = self.read.db().begin().await?;

        let mut stats = self.repository.global_stats(&mut tx).await?;

        tx.commit().await?;

        if stats.total_customers == 0 {
            stats.avg_accounts_per_customer = 0.0;
        }

        Ok(stats)
    }

    async fn customer_stats(&self, customer: CustomerId) -> Result<CustomerStats, StoreError> {
        let mut tx = self.read.db().begin().await?;

        let counts = self.repository.account_counts(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(CustomerStats {
            customer_id: customer,
            total_accounts: counts.total,
            active_accounts: counts.active,
            inactive_accounts: counts.total - counts.active,
        })
    }
}

#[automock]
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Counts across every customer and account.
    async fn global_stats(&self) -> Result<GlobalStats, StoreError>;

    /// Account counts for one customer.
    ///
    /// Unknown customers report zero counts rather than `NotFound`.
    async fn customer_stats(&self, customer: CustomerId) -> Result<CustomerStats, StoreError>;
}
