//! Customers Data

use crate::domain::{StoreError, validation};

/// New Customer Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

/// Customer Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerUpdate {
    pub name: String,
    pub email: String,
}

/// Customer fields after trimming and validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CustomerFields {
    pub(crate) name: String,
    pub(crate) email: String,
}

impl CustomerFields {
    pub(crate) fn parse(name: &str, email: &str) -> Result<Self, StoreError> {
        Ok(Self {
            name: validation::required(name, "name is required")?,
            email: validation::email(email)?,
        })
    }
}

impl TryFrom<NewCustomer> for CustomerFields {
    type Error = StoreError;

    fn try_from(customer: NewCustomer) -> Result<Self, Self::Error> {
        Self::parse(&customer.name, &customer.email)
    }
}

impl TryFrom<CustomerUpdate> for CustomerFields {
    type Error = StoreError;

    fn try_from(update: CustomerUpdate) -> Result<Self, Self::Error> {
        Self::parse(&update.name, &update.email)
    }
}
