//! Account Errors

use salvo::http::StatusError;
use tally_app::domain::StoreError;

use crate::errors::{Briefs, store_status_error};

const BRIEFS: Briefs = Briefs {
    resource: "account",
    not_found: "Account not found",
    conflict: "Account conflicts with existing data",
};

pub(crate) fn into_status_error(error: StoreError) -> StatusError {
    store_status_error(error, &BRIEFS)
}
