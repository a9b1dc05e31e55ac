//! Accounts Data

use crate::domain::{StoreError, customers::records::CustomerId, validation};

/// New Account Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub customer_id: CustomerId,
    pub name: String,
    pub status: String,
}

/// Account Update Data
///
/// The owning customer is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountUpdate {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AccountFields {
    pub(crate) name: String,
    pub(crate) status: String,
}

impl AccountFields {
    pub(crate) fn parse(name: &str, status: &str) -> Result<Self, StoreError> {
        Ok(Self {
            name: validation::required(name, "name is required")?,
            status: validation::required(status, "status is required")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_status_is_invalid_input() {
        assert!(matches!(
            AccountFields::parse("Premium Account", "  "),
            Err(StoreError::InvalidInput("status is required"))
        ));
    }

    #[test]
    fn status_is_free_text() {
        let fields = AccountFields::parse("Premium Account", "suspended");

        assert!(matches!(fields, Ok(f) if f.status == "suspended"));
    }
}
