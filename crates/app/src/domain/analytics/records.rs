//! Analytics Records

use crate::domain::customers::records::CustomerId;

/// Store-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalStats {
    pub total_customers: i64,
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub inactive_accounts: i64,
    /// Mean account count over customers owning at least one account.
    pub avg_accounts_per_customer: f64,
}

/// Account counts for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerStats {
    pub customer_id: CustomerId,
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub inactive_accounts: i64,
}
