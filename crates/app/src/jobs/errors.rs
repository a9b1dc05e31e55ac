//! Job errors.

use thiserror::Error;

use crate::domain::StoreError;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("no handler registered for job kind `{0}`")]
    UnknownKind(String),

    #[error("job payload is invalid")]
    Payload(#[from] serde_json::Error),

    #[error("job handler failed")]
    Store(#[from] StoreError),
}
