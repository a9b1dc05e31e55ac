//! Jobs Config

use std::time::Duration;

use clap::Args;
use tally_app::jobs::WorkerConfig;

/// Background worker settings.
#[derive(Debug, Args)]
pub struct JobsConfig {
    /// Run the job worker inside the server process
    #[arg(long = "jobs-worker-enabled", env = "JOBS_WORKER_ENABLED", default_value_t = false, action = clap::ArgAction::Set)]
    pub worker_enabled: bool,

    /// Number of concurrent poll loops
    #[arg(long = "jobs-concurrency", env = "JOBS_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    /// Delay between polls of an empty queue
    #[arg(long = "jobs-poll-interval-ms", env = "JOBS_POLL_INTERVAL_MS", default_value_t = 1_000_u64)]
    pub poll_interval_ms: u64,

    /// Enqueue today's aggregation at this interval
    #[arg(
        long = "jobs-schedule-interval-seconds",
        env = "JOBS_SCHEDULE_INTERVAL_SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub schedule_interval_seconds: Option<u64>,

    /// Running jobs locked for longer than this are handed to another worker
    #[arg(long = "jobs-lock-timeout-seconds", env = "JOBS_LOCK_TIMEOUT_SECONDS", default_value_t = 300_u64)]
    pub lock_timeout_seconds: u64,
}

impl JobsConfig {
    #[must_use]
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            concurrency: self.concurrency,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            lock_timeout: Duration::from_secs(self.lock_timeout_seconds),
            schedule_interval: self.schedule_interval_seconds.map(Duration::from_secs),
        }
    }
}
