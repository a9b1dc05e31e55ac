use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tally_app::database::{self, Db, PoolSettings};
use tracing_subscriber::EnvFilter;

mod db;
mod jobs;
mod user;

#[derive(Debug, Parser)]
#[command(name = "tally-app", about = "Tally CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Db(db::DbCommand),
    Jobs(jobs::JobsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Db(command) => db::run(command).await,
            Commands::Jobs(command) => jobs::run(command).await,
        }
    }
}

/// Connection options shared by every command that touches the database.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5)]
    acquire_timeout_seconds: u64,
}

impl DatabaseArgs {
    pub(crate) fn settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_seconds),
            ..PoolSettings::default()
        }
    }

    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let settings = self.settings();

        let pool = database::connect(&self.database_url, settings)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(Db::new(pool, settings.statement_timeout))
    }
}

pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
