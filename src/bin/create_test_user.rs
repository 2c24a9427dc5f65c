use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titan_lobby::maintenance::{provision_test_user, record_dev_user, TestUserSpec};
use titan_lobby::{ApiConfig, AppContext, AppError, GraphQlClient};

/// Provisions a test account: a normal-role User row plus an entry in the
/// local dev-only mapping file. The matching identity-provider account is
/// managed outside this tool.
#[derive(Parser)]
#[command(about = "Create a test user row and record it locally")]
struct Args {
    /// Email of the test account
    email: String,

    /// First name; picked from the name pool when omitted
    #[arg(long = "first")]
    first_name: Option<String>,

    /// Last name; picked from the name pool when omitted
    #[arg(long = "last")]
    last_name: Option<String>,

    /// Dev-only mapping file to record the account in
    #[arg(long, default_value = "dev-users.json")]
    mapping_file: PathBuf,

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

    let user = provision_test_user(
        context.users.as_ref(),
        TestUserSpec {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
        },
        &mut rand::rng(),
    )
    .await?;

    record_dev_user(&args.mapping_file, &user).await?;

    info!(
        user_id = %user.id,
        email = %user.email,
        mapping_file = %args.mapping_file.display(),
        "Test user ready"
    );

    Ok(())
}
