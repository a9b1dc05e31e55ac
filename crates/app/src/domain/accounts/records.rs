//! Account Records

use jiff::Timestamp;

use crate::{domain::customers::records::CustomerId, ids::TypedId};

/// Account Id
pub type AccountId = TypedId<AccountRecord>;

/// Account Record
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
