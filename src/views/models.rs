use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::models::GameStatus;

/// Name shown when a referenced user row is missing or has no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Fallback for NPC rows with no usable name.
pub const UNKNOWN_NPC_NAME: &str = "Unknown NPC";

/// Row of the join-game screen: a waiting game with host and occupancy
/// attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinableGame {
    pub id: String,
    pub code: String,
    pub name: String,
    pub host_id: String,
    pub host_name: String,
    pub player_count: usize,
    pub max_players: i32,
    pub created_at: DateTime<Utc>,
}

/// Row of the my-games screen: a game the user is seated in, with the
/// user's own seat attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyGame {
    pub id: String,
    pub code: String,
    pub name: String,
    pub host_id: String,
    pub host_name: String,
    pub status: GameStatus,
    pub player_count: usize,
    pub max_players: i32,
    pub my_player_number: i32,
    pub is_host: bool,
    pub created_at: DateTime<Utc>,
}

/// Splits my-games rows into the waiting and active section buckets the
/// my-games screen renders.
pub fn partition_by_status(games: Vec<MyGame>) -> (Vec<MyGame>, Vec<MyGame>) {
    games
        .into_iter()
        .partition(|g| g.status == GameStatus::Waiting)
}

/// One seat in a lobby, with the seated user's name and NPC flag joined
/// in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub player_number: i32,
    pub is_ready: bool,
    pub is_npc: bool,
}

/// The lobby screen's whole view: the game plus its seats in seat order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyGame {
    pub id: String,
    pub code: String,
    pub name: String,
    pub host_id: String,
    pub status: GameStatus,
    pub max_players: i32,
    pub players: Vec<LobbyPlayer>,
}

/// Roster entry for the add-NPC picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcUser {
    pub id: String,
    pub display_name: String,
    pub rating: i32,
}
