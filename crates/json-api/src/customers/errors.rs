//! Customer Errors

use salvo::http::StatusError;
use tally_app::domain::StoreError;

use crate::errors::{Briefs, store_status_error};

const BRIEFS: Briefs = Briefs {
    resource: "customer",
    not_found: "Customer not found",
    conflict: "A customer with this email already exists",
};

pub(crate) fn into_status_error(error: StoreError) -> StatusError {
    store_status_error(error, &BRIEFS)
}
