//! Store connectivity checks.

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::database::{Db, ReadDb, ReadSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    /// Analytics reads are served by the primary database.
    UsingPrimary,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::UsingPrimary => "using primary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub database: ConnectionStatus,
    pub analytics_db: ConnectionStatus,
}

impl HealthReport {
    /// Only the primary database decides overall health.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.database == ConnectionStatus::Connected
    }
}

#[derive(Debug, Clone)]
pub struct PgHealthService {
    primary: Db,
    read: ReadDb,
}

impl PgHealthService {
    #[must_use]
    pub fn new(primary: Db, read: ReadDb) -> Self {
        Self { primary, read }
    }
}

async fn probe(db: &Db, name: &'static str) -> ConnectionStatus {
    match db.ping().await {
        Ok(()) => ConnectionStatus::Connected,
        Err(error) => {
            warn!(%error, database = name, "health probe failed");

            ConnectionStatus::Disconnected
        }
    }
}

#[async_trait]
impl HealthService for PgHealthService {
    async fn check(&self) -> HealthReport {
        let database = probe(&self.primary, "primary").await;

        let analytics_db = match self.read.source() {
            ReadSource::Primary => ConnectionStatus::UsingPrimary,
            ReadSource::Follower => probe(self.read.db(), "analytics").await,
        };

        HealthReport {
            database,
            analytics_db,
        }
    }
}

#[automock]
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Probe the primary and analytics databases.
    async fn check(&self) -> HealthReport;
}

#[cfg(test)]
mod tests {
    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn reports_connected_primary_and_shared_analytics() {
        let ctx = TestContext::new().await;

        let report = ctx.health.check().await;

        assert!(report.is_healthy());
        assert_eq!(report.database, ConnectionStatus::Connected);
        assert_eq!(report.analytics_db, ConnectionStatus::UsingPrimary);
    }

    #[test]
    fn status_strings_are_stable() {
        assert_eq!(ConnectionStatus::Connected.as_str(), "connected");
        assert_eq!(ConnectionStatus::Disconnected.as_str(), "disconnected");
        assert_eq!(ConnectionStatus::UsingPrimary.as_str(), "using primary");
    }
}
