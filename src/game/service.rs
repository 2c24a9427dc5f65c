use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::models::{game_code, GameStatus, GameWithCode, DEFAULT_MAX_PLAYERS};
use super::repository::{GameRepository, NewGame, NewPlayer, PlayerRepository};
use crate::shared::AppError;

pub const DEFAULT_GAME_NAME: &str = "New Game";

/// Service for lobby bookkeeping: creating games, joining them, filling
/// slots with NPCs, and resolving join codes.
pub struct GameService {
    games: Arc<dyn GameRepository + Send + Sync>,
    players: Arc<dyn PlayerRepository + Send + Sync>,
}

impl GameService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        Self { games, players }
    }

    /// Creates a game in the waiting state and seats the host as player 1.
    ///
    /// The two writes are not a transaction: if the membership write
    /// fails, the Game row stays behind with zero players and the error
    /// propagates. There is no compensating delete.
    #[instrument(skip(self))]
    pub async fn create_game(
        &self,
        host_id: &str,
        game_name: Option<&str>,
    ) -> Result<GameWithCode, AppError> {
        let name = game_name.unwrap_or(DEFAULT_GAME_NAME);

        let game = self
            .games
            .create_game(NewGame {
                name: name.to_string(),
                host_id: host_id.to_string(),
                status: GameStatus::Waiting,
                max_players: DEFAULT_MAX_PLAYERS,
                current_battle_number: 0,
                created_at: Utc::now(),
            })
            .await?;
        debug!(game_id = %game.id, "Game row created");

        self.players
            .create_player(NewPlayer::joining(&game.id, host_id, 1, false))
            .await?;

        info!(
            game_id = %game.id,
            code = %game.code(),
            host_id = %host_id,
            "Game created with host seated"
        );

        Ok(GameWithCode::from_game(&game))
    }

    /// Seats a user in a game.
    ///
    /// Capacity is a read-then-write check against the current membership
    /// count; the backend offers no conditional writes, so two
    /// simultaneous joins can both pass the check and overfill the game
    /// or share a player number.
    #[instrument(skip(self))]
    pub async fn join_game(&self, game_id: &str, user_id: &str) -> Result<(), AppError> {
        let current_players = self.players.list_players_by_game(game_id).await?;
        let player_number = current_players.len() as i32 + 1;

        let max_players = self
            .games
            .get_game(game_id)
            .await?
            .map(|g| g.max_players)
            .unwrap_or(DEFAULT_MAX_PLAYERS);

        if current_players.len() as i32 >= max_players {
            warn!(game_id = %game_id, user_id = %user_id, "Join rejected, game is full");
            return Err(AppError::GameFull);
        }

        self.players
            .create_player(NewPlayer::joining(game_id, user_id, player_number, false))
            .await?;

        info!(
            game_id = %game_id,
            user_id = %user_id,
            player_number = player_number,
            "Player joined game"
        );
        Ok(())
    }

    /// Seats an NPC. NPCs are always ready; the caller supplies the seat
    /// number, computed from the player count it last observed.
    #[instrument(skip(self))]
    pub async fn add_npc_to_game(
        &self,
        game_id: &str,
        npc_user_id: &str,
        player_number: i32,
    ) -> Result<(), AppError> {
        self.players
            .create_player(NewPlayer::joining(game_id, npc_user_id, player_number, true))
            .await?;

        info!(
            game_id = %game_id,
            npc_user_id = %npc_user_id,
            player_number = player_number,
            "NPC added to game"
        );
        Ok(())
    }

    /// Resolves a join code against the waiting games.
    ///
    /// The code is derived, not stored, so this is a linear scan over
    /// every waiting game. Case-insensitive; `Ok(None)` when nothing
    /// matches.
    #[instrument(skip(self))]
    pub async fn find_game_by_code(&self, code: &str) -> Result<Option<GameWithCode>, AppError> {
        let waiting = self.games.list_games_by_status(GameStatus::Waiting).await?;

        let wanted = code.to_uppercase();
        let matched = waiting.into_iter().find(|game| game.code() == wanted);

        match &matched {
            Some(game) => debug!(code = %wanted, game_id = %game.id, "Join code resolved"),
            None => debug!(code = %wanted, "Join code did not match any waiting game"),
        }

        Ok(matched.map(|game| GameWithCode::from_game(&game)))
    }

    /// Join code for an existing game id; see [`game_code`].
    pub fn game_code(&self, game_id: &str) -> String {
        game_code(game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::repository::{InMemoryGameRepository, InMemoryPlayerRepository};

    fn service() -> (
        GameService,
        Arc<InMemoryGameRepository>,
        Arc<InMemoryPlayerRepository>,
    ) {
        let games = Arc::new(InMemoryGameRepository::new());
        let players = Arc::new(InMemoryPlayerRepository::new());
        (
            GameService::new(games.clone(), players.clone()),
            games,
            players,
        )
    }

    #[tokio::test]
    async fn test_create_game_seats_host_as_player_one() {
        let (service, games, players) = service();

        let created = service.create_game("host-1", Some("Friday Night")).await.unwrap();

        assert_eq!(created.name, "Friday Night");
        assert_eq!(created.host_id, "host-1");
        assert_eq!(created.status, GameStatus::Waiting);
        assert_eq!(created.max_players, DEFAULT_MAX_PLAYERS);
        assert_eq!(created.code, game_code(&created.id));

        let game = games.get_game(&created.id).await.unwrap().unwrap();
        assert_eq!(game.current_battle_number, 0);

        let seated = players.list_players_by_game(&created.id).await.unwrap();
        assert_eq!(seated.len(), 1);
        assert_eq!(seated[0].user_id, "host-1");
        assert_eq!(seated[0].player_number, 1);
        assert!(!seated[0].is_ready);
        assert_eq!(seated[0].score, 0);
    }

    #[tokio::test]
    async fn test_create_game_uses_default_name() {
        let (service, _, _) = service();

        let created = service.create_game("host-1", None).await.unwrap();
        assert_eq!(created.name, DEFAULT_GAME_NAME);
    }

    #[tokio::test]
    async fn test_join_assigns_sequential_player_numbers() {
        let (service, _, players) = service();
        let created = service.create_game("host-1", None).await.unwrap();

        service.join_game(&created.id, "user-2").await.unwrap();
        service.join_game(&created.id, "user-3").await.unwrap();

        let mut seated = players.list_players_by_game(&created.id).await.unwrap();
        seated.sort_by_key(|p| p.player_number);
        let numbers: Vec<i32> = seated.iter().map(|p| p.player_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_join_full_game_fails_without_writing() {
        let (service, _, players) = service();
        let created = service.create_game("host-1", None).await.unwrap();

        for n in 2..=4 {
            service
                .join_game(&created.id, &format!("user-{n}"))
                .await
                .unwrap();
        }

        let result = service.join_game(&created.id, "user-5").await;
        assert!(matches!(result, Err(AppError::GameFull)));

        let seated = players.list_players_by_game(&created.id).await.unwrap();
        assert_eq!(seated.len(), 4);
        assert!(!seated.iter().any(|p| p.user_id == "user-5"));
    }

    #[tokio::test]
    async fn test_join_missing_game_assumes_default_capacity() {
        // A membership row can be written against an id with no Game row;
        // the capacity check falls back to the default limit.
        let (service, _, players) = service();

        service.join_game("ghost-game", "user-1").await.unwrap();

        let seated = players.list_players_by_game("ghost-game").await.unwrap();
        assert_eq!(seated.len(), 1);
    }

    #[tokio::test]
    async fn test_add_npc_is_always_ready() {
        let (service, _, players) = service();
        let created = service.create_game("host-1", None).await.unwrap();

        service.add_npc_to_game(&created.id, "npc-1", 2).await.unwrap();

        let seated = players.list_players_by_game(&created.id).await.unwrap();
        let npc = seated.iter().find(|p| p.user_id == "npc-1").unwrap();
        assert!(npc.is_ready);
        assert_eq!(npc.player_number, 2);
    }

    #[tokio::test]
    async fn test_find_game_by_code_is_case_insensitive() {
        let (service, _, _) = service();
        let created = service.create_game("host-1", None).await.unwrap();

        let found = service
            .find_game_by_code(&created.code.to_lowercase())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.code, created.code);
    }

    #[tokio::test]
    async fn test_find_game_by_code_no_match() {
        let (service, _, _) = service();
        service.create_game("host-1", None).await.unwrap();

        let found = service.find_game_by_code("ZZZZZ").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_game_by_code_ignores_non_waiting_games() {
        let (service, games, _) = service();

        let active = games
            .create_game(NewGame {
                name: "Running Game".to_string(),
                host_id: "host-1".to_string(),
                status: GameStatus::Active,
                max_players: DEFAULT_MAX_PLAYERS,
                current_battle_number: 1,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let found = service.find_game_by_code(&active.code()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_joins_can_overfill() {
        // The capacity check is read-then-write. Interleave two joins by
        // hand: both observe three seats taken, both pass the check, and
        // the game ends up over capacity with a duplicated seat number.
        let (service, _, players) = service();
        let created = service.create_game("host-1", None).await.unwrap();
        service.join_game(&created.id, "user-2").await.unwrap();
        service.join_game(&created.id, "user-3").await.unwrap();

        let observed_by_a = players.list_players_by_game(&created.id).await.unwrap();
        let observed_by_b = players.list_players_by_game(&created.id).await.unwrap();
        assert_eq!(observed_by_a.len(), 3);
        assert_eq!(observed_by_b.len(), 3);

        let seat_a = observed_by_a.len() as i32 + 1;
        let seat_b = observed_by_b.len() as i32 + 1;
        players
            .create_player(NewPlayer::joining(&created.id, "user-4", seat_a, false))
            .await
            .unwrap();
        players
            .create_player(NewPlayer::joining(&created.id, "user-5", seat_b, false))
            .await
            .unwrap();

        let seated = players.list_players_by_game(&created.id).await.unwrap();
        assert_eq!(seated.len(), 5);
        assert_eq!(seat_a, seat_b);
    }
}
