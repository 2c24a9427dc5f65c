pub mod models;
pub mod repository;
pub mod service;

pub use models::{game_code, Game, GamePlayer, GameStatus, GameWithCode};
pub use repository::{GameRepository, PlayerRepository};
pub use service::GameService;
