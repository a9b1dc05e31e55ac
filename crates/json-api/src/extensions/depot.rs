//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

/// Typed depot lookups that fail as 500 when middleware forgot to inject.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::http::StatusCode;

    use crate::test_helpers::Mocks;

    use super::*;

    #[test]
    fn missing_state_is_500() {
        let depot = Depot::new();

        let code = depot.obtain_or_500::<Arc<crate::state::State>>().err().map(|e| e.code);

        assert_eq!(code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn injected_state_is_found() {
        let mut depot = Depot::new();

        depot.inject(Mocks::default().into_state());

        assert!(
            depot.obtain_or_500::<Arc<crate::state::State>>().is_ok(),
            "state should be found by type"
        );
    }
}
