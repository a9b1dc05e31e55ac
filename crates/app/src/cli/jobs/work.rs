use std::{sync::Arc, time::Duration};

use clap::Args;
use tally_app::{
    auth::{SigningSecret, TokenService},
    context::{AppContext, Databases},
    jobs::WorkerConfig,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct WorkArgs {
    /// Concurrent poll loops
    #[arg(long, env = "JOBS_CONCURRENCY", default_value_t = 10)]
    concurrency: usize,

    /// Milliseconds between polls of an empty queue
    #[arg(long, env = "JOBS_POLL_INTERVAL_MS", default_value_t = 1_000)]
    poll_interval_ms: u64,

    /// Seconds before a running job's lock is considered stale
    #[arg(long, env = "JOBS_LOCK_TIMEOUT_SECONDS", default_value_t = 300)]
    lock_timeout_seconds: u64,

    /// Enqueue today's aggregation at this interval
    #[arg(
        long,
        env = "JOBS_SCHEDULE_INTERVAL_SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    schedule_interval_seconds: Option<u64>,

    /// Optional read replica for analytics queries
    #[arg(long, env = "ANALYTICS_DB_URL", hide_env_values = true)]
    analytics_db_url: Option<String>,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: WorkArgs) -> Result<(), String> {
    let databases = Databases::connect(
        &args.database.database_url,
        args.analytics_db_url.as_deref(),
        args.database.settings(),
    )
    .await
    .map_err(|error| format!("failed to connect to database: {error}"))?;

    // the worker never signs or checks tokens
    let tokens = Arc::new(TokenService::new(&SigningSecret::generate()));
    let app = AppContext::new(&databases, tokens);

    let worker = Arc::new(app.worker(WorkerConfig {
        concurrency: args.concurrency,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        lock_timeout: Duration::from_secs(args.lock_timeout_seconds),
        schedule_interval: args.schedule_interval_seconds.map(Duration::from_secs),
    }));

    let (stop, shutdown) = watch::channel(false);
    let running = tokio::spawn(worker.run(shutdown));

    tokio::signal::ctrl_c()
        .await
        .map_err(|error| format!("failed to listen for ctrl-c: {error}"))?;

    info!("stopping job worker");

    if stop.send(true).is_err() {
        warn!("job worker already stopped");
    }

    if let Err(error) = running.await {
        warn!(%error, "job worker task ended abnormally");
    }

    databases.close().await;

    Ok(())
}
