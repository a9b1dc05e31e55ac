use clap::{Args, Subcommand};

mod enqueue;
mod work;

#[derive(Debug, Args)]
pub(crate) struct JobsCommand {
    #[command(subcommand)]
    command: JobsSubcommand,
}

#[derive(Debug, Subcommand)]
enum JobsSubcommand {
    /// Queue an aggregation job
    Enqueue(enqueue::EnqueueArgs),
    /// Process queued jobs until interrupted
    Work(work::WorkArgs),
}

pub(crate) async fn run(command: JobsCommand) -> Result<(), String> {
    match command.command {
        JobsSubcommand::Enqueue(args) => enqueue::run(args).await,
        JobsSubcommand::Work(args) => work::run(args).await,
    }
}
