// Client-side SDK for the Treasures of Titan lobby: device identity,
// game/membership bookkeeping against the remote GraphQL store, and the
// read models the screens render.

pub mod battle;
pub mod cards;
pub mod game;
pub mod identity;
pub mod maintenance;
pub mod shared;
pub mod store;
pub mod user;
pub mod views;

// Re-export commonly used types for easier access in binaries and tests
pub use game::{
    models::{game_code, Game, GamePlayer, GameStatus, GameWithCode},
    repository::{GameRepository, PlayerRepository},
    service::GameService,
};
pub use identity::{IdentityProvider, IdentityStore};
pub use shared::{AppContext, AppError};
pub use store::{ApiConfig, GraphQlClient};
pub use user::{models::User, repository::UserRepository, service::UserService};
pub use views::{QueryCell, QueryState, ViewAssembler};
