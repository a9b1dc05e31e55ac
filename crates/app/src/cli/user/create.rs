use std::sync::Arc;

use clap::Args;
use tally_app::auth::{AuthService, Credentials, PgAuthService, SigningSecret, TokenService};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Login name
    #[arg(long)]
    username: String,

    /// Plaintext password; stored only as an argon2 hash
    #[arg(long, env = "TALLY_USER_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = args.database.connect().await?;

    // registration never signs tokens, so any key will do
    let tokens = Arc::new(TokenService::new(&SigningSecret::generate()));
    let service = PgAuthService::new(db, tokens);

    let user = service
        .register(Credentials::new(args.username, args.password))
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_id: {}", user.id);
    println!("username: {}", user.username);

    Ok(())
}
