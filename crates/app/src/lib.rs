//! Shared application domain, persistence, and background job modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod health;
pub mod ids;
pub mod jobs;
pub mod seed;

#[cfg(test)]
mod test;
