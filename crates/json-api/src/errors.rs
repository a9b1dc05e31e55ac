//! Store error to HTTP status mapping.

use salvo::http::StatusError;
use tally_app::domain::StoreError;
use tracing::{error, warn};

use crate::observability::record_store_unavailable;

/// Client-facing messages for one kind of resource.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Briefs {
    pub(crate) resource: &'static str,
    pub(crate) not_found: &'static str,
    pub(crate) conflict: &'static str,
}

pub(crate) fn store_status_error(error: StoreError, briefs: &Briefs) -> StatusError {
    match error {
        StoreError::InvalidInput(reason) => StatusError::bad_request().brief(reason),
        StoreError::MissingReference => {
            StatusError::bad_request().brief("Referenced resource does not exist")
        }
        StoreError::NotFound => StatusError::not_found().brief(briefs.not_found),
        StoreError::Conflict => StatusError::conflict().brief(briefs.conflict),
        StoreError::Unavailable(source) => {
            warn!(resource = briefs.resource, "database unavailable: {source}");
            record_store_unavailable(briefs.resource);

            StatusError::service_unavailable().brief("Database unavailable, try again later")
        }
        StoreError::Internal(source) => {
            error!(resource = briefs.resource, "database error: {source}");

            StatusError::internal_server_error()
        }
    }
}
