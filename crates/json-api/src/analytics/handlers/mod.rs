//! Analytics Handlers

pub(crate) mod customer;
pub(crate) mod global;
