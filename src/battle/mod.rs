pub mod models;
pub mod repository;

pub use models::{Battle, BattleStatus, BattleSubmission};
pub use repository::BattleRepository;
