//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        StoreError,
        customers::{
            data::{CustomerFields, CustomerUpdate, NewCustomer},
            records::{CustomerId, CustomerRecord},
            repository::PgCustomersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let customers = self.repository.list_customers(&mut tx).await?;

        tx.commit().await?;

        Ok(customers)
    }

    async fn get_customer(&self, customer: CustomerId) -> Result<CustomerRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        let customer = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerRecord, StoreError> {
        let fields = CustomerFields::try_from(customer)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_customer(&mut tx, &fields).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_customer(
        &self,
        customer: CustomerId,
        update: CustomerUpdate,
    ) -> Result<CustomerRecord, StoreError> {
        let fields = CustomerFields::try_from(update)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_customer(&mut tx, customer, &fields)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_customer(&self, customer: CustomerId) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_customer(&mut tx, customer).await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Retrieves all customers, newest first.
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, StoreError>;

    /// Retrieve a single customer.
    async fn get_customer(&self, customer: CustomerId) -> Result<CustomerRecord, StoreError>;

    /// Creates a customer; the email must not already be registered.
    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerRecord, StoreError>;

    /// Replaces a customer's name and email.
    async fn update_customer(
        &self,
        customer: CustomerId,
        update: CustomerUpdate,
    ) -> Result<CustomerRecord, StoreError>;

    /// Deletes a customer together with all of its accounts.
    async fn delete_customer(&self, customer: CustomerId) -> Result<(), StoreError>;
}
