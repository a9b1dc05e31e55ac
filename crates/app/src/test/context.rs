//! Test context for service-level integration tests.

use std::{sync::Arc, time::Duration};

use crate::{
    auth::{PgAuthService, SigningSecret, TokenService},
    database::{Db, ReadDb},
    domain::{
        accounts::PgAccountsService, analytics::PgAnalyticsService,
        customers::PgCustomersService,
    },
    health::PgHealthService,
    jobs::PgTaskQueue,
};

use super::db::TestDb;

const STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestContext {
    pub db: TestDb,
    pub primary: Db,
    pub customers: PgCustomersService,
    pub accounts: PgAccountsService,
    pub analytics: PgAnalyticsService,
    pub auth: PgAuthService,
    pub health: PgHealthService,
    pub jobs: PgTaskQueue,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let primary = Db::new(test_db.pool().clone(), STATEMENT_TIMEOUT);
        let read = ReadDb::primary(primary.clone());

        let tokens = Arc::new(TokenService::new(&SigningSecret::from_bytes(
            b"tally-test-secret".to_vec(),
        )));

        Self {
            customers: PgCustomersService::new(primary.clone()),
            accounts: PgAccountsService::new(primary.clone()),
            analytics: PgAnalyticsService::new(read.clone()),
            auth: PgAuthService::new(primary.clone(), tokens),
            health: PgHealthService::new(primary.clone(), read),
            jobs: PgTaskQueue::new(primary.clone()),
            primary,
            db: test_db,
        }
    }
}
