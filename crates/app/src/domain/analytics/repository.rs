//! Analytics Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{analytics::records::GlobalStats, customers::records::CustomerId};

const GLOBAL_STATS_SQL: &str = include_str!("sql/global_stats.sql");
const CUSTOMER_STATS_SQL: &str = include_str!("sql/customer_stats.sql");

/// Raw per-customer counts; inactive is derived by the service.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AccountCounts {
    pub(crate) total: i64,
    pub(crate) active: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAnalyticsRepository;

impl PgAnalyticsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn global_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<GlobalStats, sqlx::Error> {
        query_as::<Postgres, GlobalStats>(GLOBAL_STATS_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn account_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerId,
    ) -> Result<AccountCounts, sqlx::Error> {
        let row = query(CUSTOMER_STATS_SQL)
            .bind(customer.into_i64())
            .fetch_one(&mut **tx)
            .await?;

        Ok(AccountCounts {
            total: row.try_get("total_accounts")?,
            active: row.try_get("active_accounts")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for GlobalStats {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            total_customers: row.try_get("total_customers")?,
            total_accounts: row.try_get("total_accounts")?,
            active_accounts: row.try_get("active_accounts")?,
            inactive_accounts: row.try_get("inactive_accounts")?,
            avg_accounts_per_customer: row.try_get("avg_accounts_per_customer")?,
        })
    }
}
