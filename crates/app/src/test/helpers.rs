//! Test Helpers

use crate::{
    domain::{
        StoreError,
        accounts::{AccountsService, data::NewAccount, records::AccountRecord},
        customers::{
            CustomersService,
            data::NewCustomer,
            records::{CustomerId, CustomerRecord},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_customer(
    ctx: &TestContext,
    name: &str,
    email: &str,
) -> Result<CustomerRecord, StoreError> {
    ctx.customers
        .create_customer(NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
        })
        .await
}

pub(crate) async fn create_account(
    ctx: &TestContext,
    customer: CustomerId,
    name: &str,
    status: &str,
) -> Result<AccountRecord, StoreError> {
    ctx.accounts
        .create_account(NewAccount {
            customer_id: customer,
            name: name.to_string(),
            status: status.to_string(),
        })
        .await
}
