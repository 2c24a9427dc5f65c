use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titan_lobby::maintenance::{cleanup_duplicate_players, find_duplicate_players};
use titan_lobby::{ApiConfig, AppContext, AppError, GraphQlClient, PlayerRepository};

/// Removes duplicate GamePlayer rows, keeping the first row per
/// (game, user) pair.
#[derive(Parser)]
#[command(about = "Remove duplicate game-player rows from the remote store")]
struct Args {
    /// GraphQL endpoint of the data service
    #[arg(long, env = "TITAN_API_URL")]
    api_url: String,

    /// API key for the data service
    #[arg(long, env = "TITAN_API_KEY")]
    api_key: String,

    /// Scan and report duplicates without deleting anything
    #[arg(long)]
    dry_run: bool,
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

    if args.dry_run {
        let all = context.players.list_all_players().await?;
        let duplicates = find_duplicate_players(&all);
        info!(
            scanned = all.len(),
            duplicates = duplicates.len(),
            "Dry run, nothing deleted"
        );
        for duplicate in &duplicates {
            info!(
                player_id = %duplicate.id,
                game_id = %duplicate.game_id,
                user_id = %duplicate.user_id,
                "Would delete duplicate seat"
            );
        }
        return Ok(());
    }

    let report = cleanup_duplicate_players(context.players.as_ref()).await?;
    info!(
        scanned = report.scanned,
        deleted = report.deleted,
        "Cleanup complete"
    );

    Ok(())
}
