use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titan_lobby::maintenance::seed_npc_users;
use titan_lobby::{ApiConfig, AppContext, AppError, GraphQlClient};

/// Creates the A-Z roster of NPC users, one per letter.
#[derive(Parser)]
#[command(about = "Seed the remote store with the A-Z NPC roster")]
struct Args {
    /// GraphQL endpoint of the data service
    #[arg(long, env = "TITAN_API_URL")]
    api_url: String,

    /// API key for the data service
    #[arg(long, env = "TITAN_API_KEY")]
    api_key: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "titan_lobby=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let client = Arc::new(GraphQlClient::new(ApiConfig::new(args.api_url, args.api_key)));
    let context = AppContext::graphql(client);

    let created = seed_npc_users(context.users.as_ref(), &mut rand::rng()).await?;

    info!(count = created.len(), "NPC users created");
    for user in &created {
        info!(
            email = %user.email,
            display_name = user.display_name.as_deref().unwrap_or(""),
            "NPC"
        );
    }

    Ok(())
}
