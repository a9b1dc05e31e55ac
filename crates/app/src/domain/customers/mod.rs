//! Customers

pub mod data;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use service::*;
