//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use tally_app::{
    auth::{MockAuthService, TokenClaims},
    context::AppContext,
    domain::{
        accounts::MockAccountsService, analytics::MockAnalyticsService,
        customers::MockCustomersService,
    },
    health::MockHealthService,
    jobs::MockTaskQueue,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_SUBJECT: &str = "tester";

/// One mock per service; any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) customers: MockCustomersService,
    pub(crate) accounts: MockAccountsService,
    pub(crate) analytics: MockAnalyticsService,
    pub(crate) auth: MockAuthService,
    pub(crate) health: MockHealthService,
    pub(crate) jobs: MockTaskQueue,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            customers: Arc::new(self.customers),
            accounts: Arc::new(self.accounts),
            analytics: Arc::new(self.analytics),
            auth: Arc::new(self.auth),
            health: Arc::new(self.health),
            jobs: Arc::new(self.jobs),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_subject(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_subject(TokenClaims {
        subject: TEST_SUBJECT.to_string(),
        issued_at: Timestamp::UNIX_EPOCH,
        expires_at: Timestamp::MAX,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Route served as if the auth middleware had admitted [`TEST_SUBJECT`].
pub(crate) fn service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_subject)
            .push(route),
    )
}

pub(crate) fn unauthenticated_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .push(route),
    )
}
