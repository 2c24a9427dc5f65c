//! Wire shapes for battles. The schema defines these collections, but no
//! resolution or turn sequencing happens client-side; the lobby only
//! needs the shapes to stay compatible with rows other components write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BattleStatus {
    #[default]
    Pending,
    Submitted,
    Completed,
}

/// One battle round within a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub id: String,
    pub game_id: String,
    pub battle_number: i32,
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub resource_reward_id: Option<String>,
    #[serde(default)]
    pub status: BattleStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A player's three-card play for one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSubmission {
    pub id: String,
    pub battle_id: String,
    pub game_player_id: String,
    pub card1_id: String,
    pub card2_id: String,
    pub card3_id: String,
    pub total_value: i32,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}
