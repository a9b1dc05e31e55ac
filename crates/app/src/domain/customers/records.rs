//! Customer Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// Customer Id
pub type CustomerId = TypedId<CustomerRecord>;

/// Customer Record
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
