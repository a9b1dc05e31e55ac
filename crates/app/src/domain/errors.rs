//! Store errors shared by every domain service.

use std::borrow::Cow;

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

/// SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("referenced resource does not exist")]
    MissingReference,

    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("store unavailable")]
    Unavailable(#[source] Error),

    #[error("storage error")]
    Internal(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(
            error,
            Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) | Error::Tls(_)
        ) {
            return Self::Unavailable(error);
        }

        let Some((kind, code)) = error
            .as_database_error()
            .map(|database| (database.kind(), database.code().map(Cow::into_owned)))
        else {
            return Self::Internal(error);
        };

        if code.as_deref() == Some(QUERY_CANCELED) {
            return Self::Unavailable(error);
        }

        match kind {
            ErrorKind::UniqueViolation => Self::Conflict,
            ErrorKind::ForeignKeyViolation => Self::MissingReference,
            ErrorKind::NotNullViolation => Self::InvalidInput("missing required data"),
            ErrorKind::CheckViolation => Self::InvalidInput("invalid data"),
            ErrorKind::Other | _ => Self::Internal(error),
        }
    }
}
