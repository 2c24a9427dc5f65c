use std::sync::Arc;
use thiserror::Error;

use crate::battle::repository::BattleRepository;
use crate::game::repository::{GameRepository, PlayerRepository};
use crate::store::GraphQlClient;
use crate::user::repository::UserRepository;

/// Shared handle to the remote collections backing the lobby.
///
/// One configured client is wired through every repository; call sites
/// receive the repositories they need instead of constructing transport
/// handles themselves.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UserRepository + Send + Sync>,
    pub games: Arc<dyn GameRepository + Send + Sync>,
    pub players: Arc<dyn PlayerRepository + Send + Sync>,
    pub battles: Arc<dyn BattleRepository + Send + Sync>,
}

impl AppContext {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        games: Arc<dyn GameRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
        battles: Arc<dyn BattleRepository + Send + Sync>,
    ) -> Self {
        Self {
            users,
            games,
            players,
            battles,
        }
    }

    /// Wires every repository over a single GraphQL client handle.
    pub fn graphql(client: Arc<GraphQlClient>) -> Self {
        Self {
            users: Arc::new(crate::user::repository::GraphQlUserRepository::new(
                client.clone(),
            )),
            games: Arc::new(crate::game::repository::GraphQlGameRepository::new(
                client.clone(),
            )),
            players: Arc::new(crate::game::repository::GraphQlPlayerRepository::new(
                client.clone(),
            )),
            battles: Arc::new(crate::battle::repository::GraphQlBattleRepository::new(
                client,
            )),
        }
    }

    /// Fully in-memory context for tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(crate::user::repository::InMemoryUserRepository::new()),
            games: Arc::new(crate::game::repository::InMemoryGameRepository::new()),
            players: Arc::new(crate::game::repository::InMemoryPlayerRepository::new()),
            battles: Arc::new(crate::battle::repository::InMemoryBattleRepository::new()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Game is full")]
    GameFull,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
