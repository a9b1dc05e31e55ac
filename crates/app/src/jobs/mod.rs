//! Background jobs backed by a Postgres queue table.

pub mod aggregation;
mod errors;
pub mod queue;
pub mod worker;

pub use errors::JobError;
pub use queue::*;
pub use worker::*;
