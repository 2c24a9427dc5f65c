use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_MAX_PLAYERS: i32 = 4;

/// Length of the human-shareable join code.
pub const GAME_CODE_LEN: usize = 5;

/// Lifecycle of a game. `Waiting` is the lobby phase during which players
/// join and ready up.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Waiting,
    Active,
    Completed,
}

/// Remote Game row. The identifier is backend-generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub host_id: String,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub current_turn_player_id: Option<String>,
    #[serde(default)]
    pub current_battle_number: i32,
    #[serde(default = "default_max_players")]
    pub max_players: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_max_players() -> i32 {
    DEFAULT_MAX_PLAYERS
}

impl Game {
    /// Join code for this game; see [`game_code`].
    pub fn code(&self) -> String {
        game_code(&self.id)
    }
}

/// Membership row linking a User to a Game. At most one row per
/// (gameId, userId) pair is intended; the backend does not enforce it,
/// which is what the duplicate-cleanup utility exists for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayer {
    pub id: String,
    pub game_id: String,
    pub user_id: String,
    #[serde(default)]
    pub player_number: i32,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub has_defense_upgrade: bool,
    #[serde(default)]
    pub has_economy_upgrade: bool,
    #[serde(default)]
    pub has_progress_cards_upgrade: bool,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Creation result and find-by-code result: a Game plus its derived code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameWithCode {
    pub id: String,
    pub code: String,
    pub name: String,
    pub host_id: String,
    pub status: GameStatus,
    pub max_players: i32,
    pub created_at: DateTime<Utc>,
}

impl GameWithCode {
    pub fn from_game(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            code: game.code(),
            name: game.name.clone(),
            host_id: game.host_id.clone(),
            status: game.status,
            max_players: game.max_players,
            created_at: game.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Derives the shareable join code from a game identifier: the first five
/// characters, upper-cased; shorter identifiers are upper-cased whole.
///
/// The code is a pure projection of the id and is never stored, so its
/// uniqueness is only as strong as identifier-prefix collision odds.
pub fn game_code(game_id: &str) -> String {
    game_id
        .chars()
        .take(GAME_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}
