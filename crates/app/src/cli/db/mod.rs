use clap::{Args, Subcommand};

use crate::cli::DatabaseArgs;

mod migrate;
mod seed;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate(DatabaseArgs),
    /// Insert sample data when no customers exist
    Seed(DatabaseArgs),
    /// Replace all customers and accounts with sample data
    Reseed(DatabaseArgs),
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate(args) => migrate::run(args).await,
        DbSubcommand::Seed(args) => seed::run(args, false).await,
        DbSubcommand::Reseed(args) => seed::run(args, true).await,
    }
}
