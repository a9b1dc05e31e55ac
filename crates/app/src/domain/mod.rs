//! Tally Domain Concerns

pub mod accounts;
pub mod analytics;
pub mod customers;
pub mod errors;
pub(crate) mod validation;

pub use errors::StoreError;
