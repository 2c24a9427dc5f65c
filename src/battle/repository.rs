use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::models::{Battle, BattleStatus};
use crate::shared::AppError;
use crate::store::client::{decode_field, decode_items};
use crate::store::GraphQlClient;

/// Fields for a Battle row to be created. The backend assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBattle {
    pub game_id: String,
    pub battle_number: i32,
    pub status: BattleStatus,
    pub created_at: DateTime<Utc>,
}

/// Trait for Battle collection operations. Create and list are the only
/// operations any client component needs today.
#[async_trait]
pub trait BattleRepository {
    async fn create_battle(&self, new_battle: NewBattle) -> Result<Battle, AppError>;
    async fn list_battles_by_game(&self, game_id: &str) -> Result<Vec<Battle>, AppError>;
}

/// In-memory implementation of BattleRepository.
pub struct InMemoryBattleRepository {
    battles: Mutex<Vec<Battle>>,
}

impl Default for InMemoryBattleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBattleRepository {
    pub fn new() -> Self {
        Self {
            battles: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BattleRepository for InMemoryBattleRepository {
    #[instrument(skip(self, new_battle))]
    async fn create_battle(&self, new_battle: NewBattle) -> Result<Battle, AppError> {
        let battle = Battle {
            id: Uuid::new_v4().to_string(),
            game_id: new_battle.game_id,
            battle_number: new_battle.battle_number,
            winner_id: None,
            resource_reward_id: None,
            status: new_battle.status,
            completed_at: None,
            created_at: Some(new_battle.created_at),
        };

        let mut battles = self.battles.lock().unwrap();
        battles.push(battle.clone());

        debug!(game_id = %battle.game_id, battle_number = battle.battle_number, "Battle created in memory");
        Ok(battle)
    }

    #[instrument(skip(self))]
    async fn list_battles_by_game(&self, game_id: &str) -> Result<Vec<Battle>, AppError> {
        let battles = self.battles.lock().unwrap();
        Ok(battles
            .iter()
            .filter(|b| b.game_id == game_id)
            .cloned()
            .collect())
    }
}

const BATTLE_FIELDS: &str =
    "id gameId battleNumber winnerId resourceRewardId status completedAt createdAt";

/// GraphQL-backed implementation of BattleRepository.
pub struct GraphQlBattleRepository {
    client: Arc<GraphQlClient>,
}

impl GraphQlBattleRepository {
    pub fn new(client: Arc<GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BattleRepository for GraphQlBattleRepository {
    #[instrument(skip(self, new_battle))]
    async fn create_battle(&self, new_battle: NewBattle) -> Result<Battle, AppError> {
        let query = format!(
            "mutation CreateBattle($input: CreateBattleInput!) {{ createBattle(input: $input) {{ {BATTLE_FIELDS} }} }}"
        );
        let input = serde_json::to_value(&new_battle)
            .map_err(|e| AppError::Backend(format!("failed to encode battle: {e}")))?;
        let data = self.client.execute(&query, json!({ "input": input })).await?;

        decode_field(&data, "createBattle")?
            .ok_or_else(|| AppError::Backend("Failed to create battle".to_string()))
    }

    #[instrument(skip(self))]
    async fn list_battles_by_game(&self, game_id: &str) -> Result<Vec<Battle>, AppError> {
        let query = format!(
            "query ListBattles($filter: ModelBattleFilterInput) {{ listBattles(filter: $filter) {{ items {{ {BATTLE_FIELDS} }} }} }}"
        );
        let variables = json!({ "filter": { "gameId": { "eq": game_id } } });
        let data = self.client.execute(&query, variables).await?;

        decode_items(&data, "listBattles")
    }
}
