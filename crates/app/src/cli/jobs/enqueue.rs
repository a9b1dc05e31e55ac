use clap::Args;
use jiff::civil::Date;
use tally_app::jobs::{
    PgTaskQueue, Queue, TaskQueue,
    aggregation::{aggregation_job, today},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct EnqueueArgs {
    /// Day to aggregate (YYYY-MM-DD); defaults to today in UTC
    #[arg(long)]
    date: Option<Date>,

    /// Queue to place the job on: critical, default or low
    #[arg(long, default_value = "default")]
    queue: Queue,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: EnqueueArgs) -> Result<(), String> {
    let db = args.database.connect().await?;
    let date = args.date.unwrap_or_else(today);

    let job = aggregation_job(date, args.queue)
        .map_err(|error| format!("failed to build job payload: {error}"))?;

    let record = PgTaskQueue::new(db)
        .enqueue(job)
        .await
        .map_err(|error| format!("failed to enqueue job: {error}"))?;

    println!("job_id: {}", record.id);
    println!("kind: {}", record.kind);
    println!("queue: {}", record.queue);
    println!("date: {date}");

    Ok(())
}
