//! Database connection management

use std::time::Duration;

use sqlx::{
    PgPool, Postgres, Transaction, migrate::Migrator, postgres::PgPoolOptions, query,
};
use tracing::{info, warn};

/// SQL used to bound every statement in a transaction by the request deadline.
pub const SET_STATEMENT_TIMEOUT_SQL: &str = "SELECT set_config('statement_timeout', $1, true)";

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Pool sizing and deadline settings shared by the primary and analytics pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_millis(5_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction whose statements are cancelled once the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection could be acquired in time, or when
    /// starting the transaction or applying the timeout fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_STATEMENT_TIMEOUT_SQL)
            .bind(statement_timeout_setting(self.statement_timeout))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Round-trip a trivial query to prove the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be reached.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(&self.pool).await.map(|_done| ())
    }

    /// Apply any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn statement_timeout_setting(timeout: Duration) -> String {
    timeout.as_millis().max(1).to_string()
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}

/// Where analytics reads are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    Primary,
    Follower,
}

/// Read-only handle used by analytics queries.
#[derive(Debug, Clone)]
pub struct ReadDb {
    db: Db,
    source: ReadSource,
}

impl ReadDb {
    #[must_use]
    pub fn primary(db: Db) -> Self {
        Self {
            db,
            source: ReadSource::Primary,
        }
    }

    #[must_use]
    pub fn follower(db: Db) -> Self {
        Self {
            db,
            source: ReadSource::Follower,
        }
    }

    #[must_use]
    pub fn db(&self) -> &Db {
        &self.db
    }

    #[must_use]
    pub fn source(&self) -> ReadSource {
        self.source
    }
}

/// Connect the analytics follower, falling back to the primary when it is
/// unset or unreachable.
pub async fn connect_read_db(
    primary: &Db,
    follower_url: Option<&str>,
    settings: PoolSettings,
) -> ReadDb {
    let Some(url) = follower_url.filter(|url| !url.trim().is_empty()) else {
        info!("analytics database not configured, analytics reads use the primary database");

        return ReadDb::primary(primary.clone());
    };

    let pool = match connect(url, settings).await {
        Ok(pool) => pool,
        Err(error) => {
            warn!(%error, "failed to connect to analytics database, falling back to primary");

            return ReadDb::primary(primary.clone());
        }
    };

    let follower = Db::new(pool, settings.statement_timeout);

    if let Err(error) = follower.ping().await {
        warn!(%error, "analytics database did not answer, falling back to primary");
        follower.close().await;

        return ReadDb::primary(primary.clone());
    }

    info!("connected to analytics database");

    ReadDb::follower(follower)
}
