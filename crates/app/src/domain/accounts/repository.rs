//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    accounts::{
        data::AccountFields,
        records::{AccountId, AccountRecord},
    },
    customers::records::CustomerId,
};

const LIST_ACCOUNTS_SQL: &str = include_str!("sql/list_accounts.sql");
const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const CREATE_ACCOUNT_SQL: &str = include_str!("sql/create_account.sql");
const UPDATE_ACCOUNT_SQL: &str = include_str!("sql/update_account.sql");
const DELETE_ACCOUNT_SQL: &str = include_str!("sql/delete_account.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_accounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<AccountRecord>, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(LIST_ACCOUNTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(GET_ACCOUNT_SQL)
            .bind(account.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerId,
        fields: &AccountFields,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(CREATE_ACCOUNT_SQL)
            .bind(customer.into_i64())
            .bind(&fields.name)
            .bind(&fields.status)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        fields: &AccountFields,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(UPDATE_ACCOUNT_SQL)
            .bind(account.into_i64())
            .bind(&fields.name)
            .bind(&fields.status)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ACCOUNT_SQL)
            .bind(account.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: AccountId::from_i64(row.try_get("id")?),
            customer_id: CustomerId::from_i64(row.try_get("customer_id")?),
            name: row.try_get("name")?,
            status: row.try_get("status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
