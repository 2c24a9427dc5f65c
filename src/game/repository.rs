use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::models::{Game, GamePlayer, GameStatus};
use crate::shared::AppError;
use crate::store::client::{decode_field, decode_items};
use crate::store::GraphQlClient;

/// Fields for a Game row to be created. The backend assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub host_id: String,
    pub status: GameStatus,
    pub max_players: i32,
    pub current_battle_number: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for a GamePlayer row to be created. The backend assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub game_id: String,
    pub user_id: String,
    pub player_number: i32,
    pub score: i32,
    pub is_ready: bool,
    pub has_defense_upgrade: bool,
    pub has_economy_upgrade: bool,
    pub has_progress_cards_upgrade: bool,
    pub joined_at: DateTime<Utc>,
}

impl NewPlayer {
    /// Membership row with the defaults every join path shares: zero
    /// score, no upgrades.
    pub fn joining(game_id: &str, user_id: &str, player_number: i32, is_ready: bool) -> Self {
        Self {
            game_id: game_id.to_string(),
            user_id: user_id.to_string(),
            player_number,
            score: 0,
            is_ready,
            has_defense_upgrade: false,
            has_economy_upgrade: false,
            has_progress_cards_upgrade: false,
            joined_at: Utc::now(),
        }
    }
}

/// Trait for Game collection operations.
#[async_trait]
pub trait GameRepository {
    async fn create_game(&self, new_game: NewGame) -> Result<Game, AppError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError>;
    async fn list_games_by_status(&self, status: GameStatus) -> Result<Vec<Game>, AppError>;
}

/// Trait for GamePlayer collection operations.
#[async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, new_player: NewPlayer) -> Result<GamePlayer, AppError>;
    async fn list_players_by_game(&self, game_id: &str) -> Result<Vec<GamePlayer>, AppError>;
    async fn list_players_by_user(&self, user_id: &str) -> Result<Vec<GamePlayer>, AppError>;

    /// Full scan in storage order. Exists for the duplicate-cleanup
    /// utility.
    async fn list_all_players(&self) -> Result<Vec<GamePlayer>, AppError>;

    /// Exists for the duplicate-cleanup utility; normal app flow never
    /// deletes membership rows.
    async fn delete_player(&self, player_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of GameRepository for development and testing.
pub struct InMemoryGameRepository {
    games: Mutex<HashMap<String, Game>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, new_game))]
    async fn create_game(&self, new_game: NewGame) -> Result<Game, AppError> {
        let game = Game {
            id: Uuid::new_v4().to_string(),
            name: new_game.name,
            host_id: new_game.host_id,
            status: new_game.status,
            current_turn_player_id: None,
            current_battle_number: new_game.current_battle_number,
            max_players: new_game.max_players,
            created_at: Some(new_game.created_at),
            completed_at: None,
        };

        let mut games = self.games.lock().unwrap();
        games.insert(game.id.clone(), game.clone());

        info!(game_id = %game.id, host_id = %game.host_id, "Game created in memory");
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        let games = self.games.lock().unwrap();
        let game = games.get(game_id).cloned();

        debug!(game_id = %game_id, found = game.is_some(), "Fetched game from memory");
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn list_games_by_status(&self, status: GameStatus) -> Result<Vec<Game>, AppError> {
        let games = self.games.lock().unwrap();
        let matches: Vec<Game> = games
            .values()
            .filter(|g| g.status == status)
            .cloned()
            .collect();

        debug!(status = %status, count = matches.len(), "Listed games by status");
        Ok(matches)
    }
}

/// In-memory implementation of PlayerRepository.
///
/// Rows are held in insertion order so a full scan observes the same
/// first-seen ordering the duplicate cleanup relies on.
pub struct InMemoryPlayerRepository {
    players: Mutex<Vec<GamePlayer>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, new_player))]
    async fn create_player(&self, new_player: NewPlayer) -> Result<GamePlayer, AppError> {
        let player = GamePlayer {
            id: Uuid::new_v4().to_string(),
            game_id: new_player.game_id,
            user_id: new_player.user_id,
            player_number: new_player.player_number,
            score: new_player.score,
            is_ready: new_player.is_ready,
            has_defense_upgrade: new_player.has_defense_upgrade,
            has_economy_upgrade: new_player.has_economy_upgrade,
            has_progress_cards_upgrade: new_player.has_progress_cards_upgrade,
            joined_at: Some(new_player.joined_at),
        };

        let mut players = self.players.lock().unwrap();
        players.push(player.clone());

        info!(
            game_id = %player.game_id,
            user_id = %player.user_id,
            player_number = player.player_number,
            "Player added in memory"
        );
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn list_players_by_game(&self, game_id: &str) -> Result<Vec<GamePlayer>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_players_by_user(&self, user_id: &str) -> Result<Vec<GamePlayer>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_all_players(&self) -> Result<Vec<GamePlayer>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.clone())
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: &str) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        players.retain(|p| p.id != player_id);

        debug!(player_id = %player_id, "Player deleted from memory");
        Ok(())
    }
}

const GAME_FIELDS: &str =
    "id name hostId status currentTurnPlayerId currentBattleNumber maxPlayers createdAt completedAt";
const PLAYER_FIELDS: &str =
    "id gameId userId playerNumber score isReady hasDefenseUpgrade hasEconomyUpgrade hasProgressCardsUpgrade joinedAt";

/// GraphQL-backed implementation of GameRepository.
pub struct GraphQlGameRepository {
    client: Arc<GraphQlClient>,
}

impl GraphQlGameRepository {
    pub fn new(client: Arc<GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GameRepository for GraphQlGameRepository {
    #[instrument(skip(self, new_game))]
    async fn create_game(&self, new_game: NewGame) -> Result<Game, AppError> {
        let query = format!(
            "mutation CreateGame($input: CreateGameInput!) {{ createGame(input: $input) {{ {GAME_FIELDS} }} }}"
        );
        let input = serde_json::to_value(&new_game)
            .map_err(|e| AppError::Backend(format!("failed to encode game: {e}")))?;
        let data = self.client.execute(&query, json!({ "input": input })).await?;

        decode_field(&data, "createGame")?
            .ok_or_else(|| AppError::Backend("Failed to create game".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        let query = format!("query GetGame($id: ID!) {{ getGame(id: $id) {{ {GAME_FIELDS} }} }}");
        let data = self
            .client
            .execute(&query, json!({ "id": game_id }))
            .await?;

        decode_field(&data, "getGame")
    }

    #[instrument(skip(self))]
    async fn list_games_by_status(&self, status: GameStatus) -> Result<Vec<Game>, AppError> {
        let query = format!(
            "query ListGames($filter: ModelGameFilterInput) {{ listGames(filter: $filter) {{ items {{ {GAME_FIELDS} }} }} }}"
        );
        let variables = json!({ "filter": { "status": { "eq": status.to_string() } } });
        let data = self.client.execute(&query, variables).await?;

        decode_items(&data, "listGames")
    }
}

/// GraphQL-backed implementation of PlayerRepository.
pub struct GraphQlPlayerRepository {
    client: Arc<GraphQlClient>,
}

impl GraphQlPlayerRepository {
    pub fn new(client: Arc<GraphQlClient>) -> Self {
        Self { client }
    }

    async fn list_with_filter(
        &self,
        filter: serde_json::Value,
    ) -> Result<Vec<GamePlayer>, AppError> {
        let query = format!(
            "query ListGamePlayers($filter: ModelGamePlayerFilterInput) {{ listGamePlayers(filter: $filter) {{ items {{ {PLAYER_FIELDS} }} }} }}"
        );
        let data = self.client.execute(&query, json!({ "filter": filter })).await?;

        decode_items(&data, "listGamePlayers")
    }
}

#[async_trait]
impl PlayerRepository for GraphQlPlayerRepository {
    #[instrument(skip(self, new_player))]
    async fn create_player(&self, new_player: NewPlayer) -> Result<GamePlayer, AppError> {
        let query = format!(
            "mutation CreateGamePlayer($input: CreateGamePlayerInput!) {{ createGamePlayer(input: $input) {{ {PLAYER_FIELDS} }} }}"
        );
        let input = serde_json::to_value(&new_player)
            .map_err(|e| AppError::Backend(format!("failed to encode player: {e}")))?;
        let data = self.client.execute(&query, json!({ "input": input })).await?;

        decode_field(&data, "createGamePlayer")?
            .ok_or_else(|| AppError::Backend("Failed to create game player".to_string()))
    }

    #[instrument(skip(self))]
    async fn list_players_by_game(&self, game_id: &str) -> Result<Vec<GamePlayer>, AppError> {
        self.list_with_filter(json!({ "gameId": { "eq": game_id } }))
            .await
    }

    #[instrument(skip(self))]
    async fn list_players_by_user(&self, user_id: &str) -> Result<Vec<GamePlayer>, AppError> {
        self.list_with_filter(json!({ "userId": { "eq": user_id } }))
            .await
    }

    #[instrument(skip(self))]
    async fn list_all_players(&self) -> Result<Vec<GamePlayer>, AppError> {
        let query = format!(
            "query ListGamePlayers {{ listGamePlayers {{ items {{ {PLAYER_FIELDS} }} }} }}"
        );
        let data = self.client.execute(&query, json!({})).await?;

        decode_items(&data, "listGamePlayers")
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: &str) -> Result<(), AppError> {
        let query = "mutation DeleteGamePlayer($input: DeleteGamePlayerInput!) { deleteGamePlayer(input: $input) { id } }";
        self.client
            .execute(query, json!({ "input": { "id": player_id } }))
            .await?;

        Ok(())
    }
}
