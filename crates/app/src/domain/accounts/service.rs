//! Accounts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        StoreError,
        accounts::{
            data::{AccountFields, AccountUpdate, NewAccount},
            records::{AccountId, AccountRecord},
            repository::PgAccountsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let accounts = self.repository.list_accounts(&mut tx).await?;

        tx.commit().await?;

        Ok(accounts)
    }

    async fn get_account(&self, account: AccountId) -> Result<AccountRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        let account = self.repository.get_account(&mut tx, account).await?;

        tx.commit().await?;

        Ok(account)
    }

    async fn create_account(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let fields = AccountFields::parse(&account.name, &account.status)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_account(&mut tx, account.customer_id, &fields)
            .await
            .map_err(|error| match StoreError::from(error) {
                StoreError::MissingReference => StoreError::InvalidInput("customer does not exist"),
                other => other,
            })?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_account(
        &self,
        account: AccountId,
        update: AccountUpdate,
    ) -> Result<AccountRecord, StoreError> {
        let fields = AccountFields::parse(&update.name, &update.status)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_account(&mut tx, account, &fields)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_account(&self, account: AccountId) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_account(&mut tx, account).await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Retrieves all accounts, newest first.
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, StoreError>;

    /// Retrieve a single account.
    async fn get_account(&self, account: AccountId) -> Result<AccountRecord, StoreError>;

    /// Creates an account under an existing customer.
    async fn create_account(&self, account: NewAccount) -> Result<AccountRecord, StoreError>;

    /// Replaces an account's name and status.
    async fn update_account(
        &self,
        account: AccountId,
        update: AccountUpdate,
    ) -> Result<AccountRecord, StoreError>;

    /// Deletes a single account.
    async fn delete_account(&self, account: AccountId) -> Result<(), StoreError>;
}
