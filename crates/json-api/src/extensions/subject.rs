//! Authenticated subject stored in the depot by the auth middleware.

use salvo::prelude::{Depot, StatusError};
use tally_app::auth::TokenClaims;

pub(crate) trait SubjectExt {
    fn insert_subject(&mut self, claims: TokenClaims);

    fn subject_or_401(&self) -> Result<&TokenClaims, StatusError>;
}

impl SubjectExt for Depot {
    fn insert_subject(&mut self, claims: TokenClaims) {
        self.inject(claims);
    }

    fn subject_or_401(&self) -> Result<&TokenClaims, StatusError> {
        self.obtain::<TokenClaims>()
            .map_err(|_missing| StatusError::unauthorized().brief("Authentication required"))
    }
}
