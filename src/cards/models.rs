//! Wire shapes for the card and resource collections. Deck handling and
//! play happen elsewhere; the lobby carries the shapes so rows written by
//! other components decode cleanly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardType {
    Battle,
    Progress,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardColor {
    Purple,
    Orange,
    Blue,
    Yellow,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressGroup {
    Alien,
    Allied,
    Military,
    Native,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    Energy,
    Food,
    Lumber,
    Mineral,
    Wild,
}

/// A card held by a seated player, battle or progress flavored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub id: String,
    pub game_player_id: String,
    pub card_type: CardType,
    #[serde(default)]
    pub color: Option<CardColor>,
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub progress_card_id: Option<String>,
    #[serde(default)]
    pub group: Option<ProgressGroup>,
    #[serde(default = "default_true")]
    pub is_in_hand: bool,
    #[serde(default)]
    pub is_played: bool,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Catalog entry for a progress card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<ProgressGroup>,
    pub rank: i32,
    pub value: i32,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A resource card held by a seated player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResource {
    pub id: String,
    pub game_player_id: String,
    pub resource_card_id: String,
    #[serde(default)]
    pub acquired_at: Option<DateTime<Utc>>,
}

/// Catalog entry for a resource card. `resources` is a free-form list of
/// the resource types the card provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    pub trade_value: i32,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub is_winner_card: bool,
    #[serde(default)]
    pub resources: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_card_defaults() {
        let card: PlayerCard = serde_json::from_value(serde_json::json!({
            "id": "card-1",
            "gamePlayerId": "gp-1",
            "cardType": "battle",
            "color": "purple",
            "value": 7
        }))
        .unwrap();

        assert_eq!(card.card_type, CardType::Battle);
        assert_eq!(card.color, Some(CardColor::Purple));
        assert!(card.is_in_hand);
        assert!(!card.is_played);
        assert_eq!(card.rank, 0);
    }

    #[test]
    fn test_enum_wire_forms_are_lowercase() {
        assert_eq!(
            serde_json::to_value(ResourceType::Lumber).unwrap(),
            serde_json::json!("lumber")
        );
        assert_eq!(ProgressGroup::Military.to_string(), "military");
    }
}
