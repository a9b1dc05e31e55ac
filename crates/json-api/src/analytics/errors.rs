//! Analytics Errors

use salvo::http::StatusError;
use tally_app::domain::StoreError;

use crate::errors::{Briefs, store_status_error};

const BRIEFS: Briefs = Briefs {
    resource: "analytics",
    not_found: "Customer not found",
    conflict: "Analytics request conflicts with existing data",
};

pub(crate) fn into_status_error(error: StoreError) -> StatusError {
    store_status_error(error, &BRIEFS)
}
