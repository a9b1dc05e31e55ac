//! Auth Errors

use salvo::http::StatusError;
use tally_app::{auth::AuthServiceError, domain::StoreError};
use tracing::{debug, error, warn};

use crate::observability::record_store_unavailable;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidInput(reason) => StatusError::bad_request().brief(reason),
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid username or password")
        }
        AuthServiceError::InvalidToken(source) => {
            debug!("rejected bearer token: {source}");

            StatusError::unauthorized().brief("Invalid or expired token")
        }
        AuthServiceError::UsernameTaken => StatusError::conflict().brief("Username already exists"),
        AuthServiceError::Issue(source) => {
            error!("failed to issue session token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Credential(source) => {
            error!("failed to process credentials: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Store(StoreError::Unavailable(source)) => {
            warn!("database unavailable during authentication: {source}");
            record_store_unavailable("user");

            StatusError::service_unavailable().brief("Database unavailable, try again later")
        }
        AuthServiceError::Store(source) => {
            error!("failed to read credentials: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use tally_app::auth::TokenError;

    use super::*;

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (AuthServiceError::InvalidInput("username is required"), StatusCode::BAD_REQUEST),
            (AuthServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AuthServiceError::InvalidToken(TokenError::Expired),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthServiceError::UsernameTaken, StatusCode::CONFLICT),
            (
                AuthServiceError::Issue(TokenError::OutOfRange),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthServiceError::Store(StoreError::Unavailable(sqlx::Error::PoolClosed)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AuthServiceError::Store(StoreError::Internal(sqlx::Error::WorkerCrashed)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }
}
