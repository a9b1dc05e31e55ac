//! Authentication

mod credentials;
mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use credentials::*;
pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
