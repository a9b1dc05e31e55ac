use tally_app::seed::{self, SeedOutcome};

use crate::cli::DatabaseArgs;

pub(crate) async fn run(args: DatabaseArgs, replace: bool) -> Result<(), String> {
    let db = args.connect().await?;

    let outcome = if replace {
        seed::reseed(&db).await
    } else {
        seed::seed_if_empty(&db).await
    }
    .map_err(|error| format!("failed to seed database: {error}"))?;

    match outcome {
        SeedOutcome::Skipped => println!("customers already exist, nothing seeded"),
        SeedOutcome::Seeded {
            customers,
            accounts,
        } => println!("seeded {customers} customers and {accounts} accounts"),
    }

    Ok(())
}
