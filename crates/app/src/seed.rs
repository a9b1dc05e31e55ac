//! Sample data for local development.

use sqlx::query;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        StoreError,
        accounts::{data::AccountFields, repository::PgAccountsRepository},
        customers::{data::CustomerFields, repository::PgCustomersRepository},
    },
};

const CLEAR_SAMPLE_DATA_SQL: &str = "TRUNCATE accounts, customers RESTART IDENTITY";

/// Sample customers as `(name, email)`.
pub const SAMPLE_CUSTOMERS: [(&str, &str); 5] = [
    ("Acme Corporation", "contact@acme.com"),
    ("TechStart Inc", "info@techstart.com"),
    ("Global Solutions Ltd", "hello@globalsolutions.com"),
    ("Digital Innovations", "support@digitalinnovations.com"),
    ("Enterprise Systems", "sales@enterprisesystems.com"),
];

/// Sample accounts as `(index into SAMPLE_CUSTOMERS, name, status)`.
pub const SAMPLE_ACCOUNTS: [(usize, &str, &str); 11] = [
    (0, "Premium Account", "active"),
    (0, "Basic Account", "active"),
    (0, "Trial Account", "inactive"),
    (1, "Enterprise Account", "active"),
    (1, "Starter Account", "active"),
    (2, "Corporate Account", "active"),
    (2, "Legacy Account", "inactive"),
    (3, "Pro Account", "active"),
    (4, "Business Account", "active"),
    (4, "Standard Account", "active"),
    (4, "Archive Account", "inactive"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Customers already existed; nothing was written.
    Skipped,
    Seeded { customers: usize, accounts: usize },
}

/// Insert the sample data unless any customer exists.
///
/// # Errors
///
/// Returns an error when the store rejects a read or write.
pub async fn seed_if_empty(db: &Db) -> Result<SeedOutcome, StoreError> {
    let customers = PgCustomersRepository::new();
    let mut tx = db.begin().await?;

    if customers.count_customers(&mut tx).await? > 0 {
        info!("customers already present, skipping seed data");

        return Ok(SeedOutcome::Skipped);
    }

    let outcome = insert_sample_data(&mut tx).await?;

    tx.commit().await?;

    Ok(outcome)
}

/// Wipe customers and accounts, then insert the sample data.
///
/// # Errors
///
/// Returns an error when the store rejects a read or write.
pub async fn reseed(db: &Db) -> Result<SeedOutcome, StoreError> {
    let mut tx = db.begin().await?;

    query(CLEAR_SAMPLE_DATA_SQL).execute(&mut *tx).await?;

    let outcome = insert_sample_data(&mut tx).await?;

    tx.commit().await?;

    Ok(outcome)
}

async fn insert_sample_data(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<SeedOutcome, StoreError> {
    let customers = PgCustomersRepository::new();
    let accounts = PgAccountsRepository::new();

    let mut ids = Vec::with_capacity(SAMPLE_CUSTOMERS.len());

    for (name, email) in SAMPLE_CUSTOMERS {
        let created = customers
            .create_customer(tx, &CustomerFields::parse(name, email)?)
            .await?;

        ids.push(created.id);
    }

    for (owner, name, status) in SAMPLE_ACCOUNTS {
        let customer = ids
            .get(owner)
            .copied()
            .ok_or(StoreError::InvalidInput("sample account owner is missing"))?;

        accounts
            .create_account(tx, customer, &AccountFields::parse(name, status)?)
            .await?;
    }

    info!(
        customers = SAMPLE_CUSTOMERS.len(),
        accounts = SAMPLE_ACCOUNTS.len(),
        "seeded sample data"
    );

    Ok(SeedOutcome::Seeded {
        customers: SAMPLE_CUSTOMERS.len(),
        accounts: SAMPLE_ACCOUNTS.len(),
    })
}
