//! Tally JSON API Server

use std::{process, sync::Arc};

use salvo::{
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
};
use tokio::sync::watch;
use tracing::{error, info, warn};

use tally_app::{
    auth::{SigningSecret, TokenService},
    context::{AppContext, Databases},
    seed::{SeedOutcome, seed_if_empty},
};

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod accounts;
mod analytics;
mod auth;
mod config;
mod customers;
mod errors;
mod extensions;
mod healthcheck;
mod observability;
mod root;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Tally JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "subscriber failed to install, nothing else can report this"
            )]
            {
                eprintln!("Observability error: {init_error}");
            }

            process::exit(1);
        }
    };

    let databases = match Databases::connect(
        &config.database.database_url,
        config.database.analytics_db_url.as_deref(),
        config.pool_settings(),
    )
    .await
    {
        Ok(databases) => databases,
        Err(init_error) => {
            error!("failed to connect to database: {init_error}");

            process::exit(1);
        }
    };

    if config.database.run_migrations {
        if let Err(migrate_error) = databases.migrate().await {
            error!("failed to apply migrations: {migrate_error}");

            process::exit(1);
        }

        info!("migrations applied");
    }

    if config.database.seed_data {
        match seed_if_empty(&databases.primary).await {
            Ok(SeedOutcome::Seeded { customers, accounts }) => {
                info!(customers, accounts, "seed data inserted");
            }
            Ok(SeedOutcome::Skipped) => {}
            Err(seed_error) => warn!("failed to seed data: {seed_error}"),
        }
    }

    let secret = SigningSecret::from_config(config.auth.jwt_secret.clone());
    let app = AppContext::new(&databases, Arc::new(TokenService::new(&secret)));

    let (stop_workers, workers_stopped) = watch::channel(false);

    let worker = config.jobs.worker_enabled.then(|| {
        let worker = Arc::new(app.worker(config.jobs.worker_config()));

        info!(concurrency = config.jobs.concurrency, "starting job worker");

        tokio::spawn(worker.run(workers_stopped))
    });

    let router = router::app_router(
        State::from_app_context(app),
        config.server.frontend_dir(),
    );

    let doc = OpenApi::new("Tally API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .unshift(doc.into_router("/api-doc/openapi.json"))
        .unshift(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    let signals = stop_workers.clone();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, signals).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    _ = stop_workers.send(true);

    if let Some(worker) = worker
        && let Err(join_error) = worker.await
    {
        error!("job worker exited abnormally: {join_error}");
    }

    databases.close().await;

    info!("server stopped");

    observability.shutdown();
}
