//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenService},
    database::{self, Db, PoolSettings, ReadDb},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        analytics::{AnalyticsService, PgAnalyticsService},
        customers::{CustomersService, PgCustomersService},
    },
    health::{HealthService, PgHealthService},
    jobs::{
        JobHandlers, PgTaskQueue, TaskQueue, Worker, WorkerConfig,
        aggregation::AggregationHandler,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] MigrateError),
}

/// Primary pool plus the pool analytics reads go through.
#[derive(Debug, Clone)]
pub struct Databases {
    pub primary: Db,
    pub read: ReadDb,
}

impl Databases {
    /// Connect the primary database and, when configured, the analytics follower.
    ///
    /// # Errors
    ///
    /// Returns an error when the primary database cannot be reached. A
    /// missing follower only downgrades analytics to the primary.
    pub async fn connect(
        url: &str,
        analytics_url: Option<&str>,
        settings: PoolSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, settings)
            .await
            .map_err(AppInitError::Database)?;

        let primary = Db::new(pool, settings.statement_timeout);
        let read = database::connect_read_db(&primary, analytics_url, settings).await;

        Ok(Self { primary, read })
    }

    /// # Errors
    ///
    /// Returns an error when a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), AppInitError> {
        self.primary
            .migrate()
            .await
            .map_err(AppInitError::Migrations)
    }

    pub async fn close(&self) {
        if self.read.source() == database::ReadSource::Follower {
            self.read.db().close().await;
        }

        self.primary.close().await;
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub customers: Arc<dyn CustomersService>,
    pub accounts: Arc<dyn AccountsService>,
    pub analytics: Arc<dyn AnalyticsService>,
    pub auth: Arc<dyn AuthService>,
    pub health: Arc<dyn HealthService>,
    pub jobs: Arc<dyn TaskQueue>,
}

impl AppContext {
    /// Build application context over connected databases.
    #[must_use]
    pub fn new(databases: &Databases, tokens: Arc<TokenService>) -> Self {
        let primary = databases.primary.clone();

        Self {
            customers: Arc::new(PgCustomersService::new(primary.clone())),
            accounts: Arc::new(PgAccountsService::new(primary.clone())),
            analytics: Arc::new(PgAnalyticsService::new(databases.read.clone())),
            auth: Arc::new(PgAuthService::new(primary.clone(), tokens)),
            health: Arc::new(PgHealthService::new(
                primary.clone(),
                databases.read.clone(),
            )),
            jobs: Arc::new(PgTaskQueue::new(primary)),
        }
    }

    /// Worker wired with every job handler this application knows about.
    #[must_use]
    pub fn worker(&self, config: WorkerConfig) -> Worker {
        let handlers = JobHandlers::default().register(Arc::new(AggregationHandler::new(
            Arc::clone(&self.analytics),
        )));

        Worker::new(Arc::clone(&self.jobs), handlers, config)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
