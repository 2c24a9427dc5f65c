use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{
    JoinableGame, LobbyGame, LobbyPlayer, MyGame, NpcUser, UNKNOWN_NAME, UNKNOWN_NPC_NAME,
};
use crate::game::models::{Game, GamePlayer, GameStatus};
use crate::game::repository::{GameRepository, PlayerRepository};
use crate::shared::AppError;
use crate::user::models::{User, DEFAULT_RATING, ROLE_NPC};
use crate::user::repository::UserRepository;

pub const DEFAULT_FAN_OUT_LIMIT: usize = 8;

/// Builds the screen-facing read models by joining across collections
/// client-side.
///
/// The backend has no server-side joins, so every screen row costs point
/// queries against the related collections. Rows fan out concurrently up
/// to `fan_out_limit`, and the queries assembling one row run
/// concurrently with each other. Any repository error fails the whole
/// assembly; missing related rows degrade through the name fallbacks
/// instead.
pub struct ViewAssembler {
    games: Arc<dyn GameRepository + Send + Sync>,
    players: Arc<dyn PlayerRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    fan_out_limit: usize,
}

impl ViewAssembler {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            games,
            players,
            users,
            fan_out_limit: DEFAULT_FAN_OUT_LIMIT,
        }
    }

    /// Overrides how many per-row query chains run at once.
    pub fn with_fan_out_limit(mut self, limit: usize) -> Self {
        self.fan_out_limit = limit.max(1);
        self
    }

    /// Waiting games with host name and occupancy, newest first.
    #[instrument(skip(self))]
    pub async fn joinable_games(&self) -> Result<Vec<JoinableGame>, AppError> {
        let waiting = self.games.list_games_by_status(GameStatus::Waiting).await?;
        debug!(count = waiting.len(), "Assembling joinable games");

        let assembled: Vec<Result<JoinableGame, AppError>> = stream::iter(waiting)
            .map(|game| self.assemble_joinable(game))
            .buffer_unordered(self.fan_out_limit)
            .collect()
            .await;

        let mut rows = assembled.into_iter().collect::<Result<Vec<_>, _>>()?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn assemble_joinable(&self, game: Game) -> Result<JoinableGame, AppError> {
        let (players, host) = futures::try_join!(
            self.players.list_players_by_game(&game.id),
            self.users.get_user(&game.host_id),
        )?;

        Ok(JoinableGame {
            code: game.code(),
            id: game.id,
            name: game.name,
            host_name: host_name_of(host.as_ref()),
            host_id: game.host_id,
            player_count: players.len(),
            max_players: game.max_players,
            created_at: game.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Games the user is seated in, newest first. Completed games and
    /// seats whose Game row has disappeared are dropped.
    #[instrument(skip(self))]
    pub async fn my_games(&self, user_id: &str) -> Result<Vec<MyGame>, AppError> {
        let participations = self.players.list_players_by_user(user_id).await?;
        if participations.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = participations.len(), "Assembling my games");

        let assembled: Vec<Result<Option<MyGame>, AppError>> = stream::iter(participations)
            .map(|participation| self.assemble_my_game(participation, user_id))
            .buffer_unordered(self.fan_out_limit)
            .collect()
            .await;

        let mut rows = assembled
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn assemble_my_game(
        &self,
        participation: GamePlayer,
        user_id: &str,
    ) -> Result<Option<MyGame>, AppError> {
        let Some(game) = self.games.get_game(&participation.game_id).await? else {
            return Ok(None);
        };
        if game.status == GameStatus::Completed {
            return Ok(None);
        }

        let (players, host) = futures::try_join!(
            self.players.list_players_by_game(&game.id),
            self.users.get_user(&game.host_id),
        )?;

        Ok(Some(MyGame {
            code: game.code(),
            id: game.id,
            name: game.name,
            host_name: host_name_of(host.as_ref()),
            is_host: game.host_id == user_id,
            host_id: game.host_id,
            status: game.status,
            player_count: players.len(),
            max_players: game.max_players,
            my_player_number: participation.player_number,
            created_at: game.created_at.unwrap_or_else(Utc::now),
        }))
    }

    /// One lobby: the game plus every seat with the seated user's name
    /// and NPC flag, in seat order. A missing game is an error here, not
    /// an empty view.
    #[instrument(skip(self))]
    pub async fn game_lobby(&self, game_id: &str) -> Result<LobbyGame, AppError> {
        let game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        let members = self.players.list_players_by_game(game_id).await?;
        debug!(count = members.len(), "Assembling lobby seats");

        let assembled: Vec<Result<LobbyPlayer, AppError>> = stream::iter(members)
            .map(|member| self.assemble_lobby_player(member))
            .buffer_unordered(self.fan_out_limit)
            .collect()
            .await;

        let mut players = assembled.into_iter().collect::<Result<Vec<_>, _>>()?;
        players.sort_by_key(|p| p.player_number);

        Ok(LobbyGame {
            code: game.code(),
            id: game.id,
            name: game.name,
            host_id: game.host_id,
            status: game.status,
            max_players: game.max_players,
            players,
        })
    }

    async fn assemble_lobby_player(&self, member: GamePlayer) -> Result<LobbyPlayer, AppError> {
        let user = self.users.get_user(&member.user_id).await?;

        Ok(LobbyPlayer {
            id: member.id,
            user_id: member.user_id,
            display_name: host_name_of(user.as_ref()),
            player_number: member.player_number,
            is_ready: member.is_ready,
            is_npc: user.map(|u| u.is_npc()).unwrap_or(false),
        })
    }

    /// NPC users available to fill seats, alphabetical by display name.
    #[instrument(skip(self))]
    pub async fn npc_roster(&self) -> Result<Vec<NpcUser>, AppError> {
        let npcs = self.users.list_users_by_role(ROLE_NPC).await?;

        let mut roster: Vec<NpcUser> = npcs
            .into_iter()
            .map(|user| NpcUser {
                display_name: user
                    .preferred_name()
                    .unwrap_or(UNKNOWN_NPC_NAME)
                    .to_string(),
                id: user.id,
                rating: if user.rating == 0 {
                    DEFAULT_RATING
                } else {
                    user.rating
                },
            })
            .collect();

        roster.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(roster)
    }
}

fn host_name_of(user: Option<&User>) -> String {
    user.and_then(User::preferred_name)
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::repository::{
        InMemoryGameRepository, InMemoryPlayerRepository, NewGame, NewPlayer,
    };
    use crate::game::service::GameService;
    use crate::user::models::ROLE_ANONYMOUS;
    use crate::user::repository::InMemoryUserRepository;
    use chrono::Duration;

    struct Fixture {
        games: Arc<InMemoryGameRepository>,
        players: Arc<InMemoryPlayerRepository>,
        users: Arc<InMemoryUserRepository>,
        service: GameService,
        assembler: ViewAssembler,
    }

    fn fixture() -> Fixture {
        let games = Arc::new(InMemoryGameRepository::new());
        let players = Arc::new(InMemoryPlayerRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        Fixture {
            service: GameService::new(games.clone(), players.clone()),
            assembler: ViewAssembler::new(games.clone(), players.clone(), users.clone())
                .with_fan_out_limit(4),
            games,
            players,
            users,
        }
    }

    async fn seed_user(fixture: &Fixture, id: &str, display_name: Option<&str>, role: i32) {
        fixture
            .users
            .create_user(&User {
                id: id.to_string(),
                email: format!("{id}@example.com"),
                first_name: None,
                last_name: None,
                display_name: display_name.map(str::to_string),
                role,
                rating: DEFAULT_RATING,
                created_at: Some(Utc::now()),
                updated_at: Some(Utc::now()),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_joinable_games_attach_host_and_count() {
        let fixture = fixture();
        seed_user(&fixture, "host-1", Some("Hosty"), ROLE_ANONYMOUS).await;

        let created = fixture.service.create_game("host-1", None).await.unwrap();
        fixture.service.join_game(&created.id, "user-2").await.unwrap();

        let rows = fixture.assembler.joinable_games().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].host_name, "Hosty");
        assert_eq!(rows[0].player_count, 2);
        assert_eq!(rows[0].code, created.code);
    }

    #[tokio::test]
    async fn test_joinable_games_sorted_newest_first() {
        let fixture = fixture();
        let now = Utc::now();

        for (name, age_minutes) in [("old", 30), ("new", 1), ("middle", 10)] {
            fixture
                .games
                .create_game(NewGame {
                    name: name.to_string(),
                    host_id: "host-1".to_string(),
                    status: GameStatus::Waiting,
                    max_players: 4,
                    current_battle_number: 0,
                    created_at: now - Duration::minutes(age_minutes),
                })
                .await
                .unwrap();
        }

        let rows = fixture.assembler.joinable_games().await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_joinable_games_missing_host_is_unknown() {
        let fixture = fixture();
        fixture.service.create_game("ghost-host", None).await.unwrap();

        let rows = fixture.assembler.joinable_games().await.unwrap();
        assert_eq!(rows[0].host_name, UNKNOWN_NAME);
    }

    #[tokio::test]
    async fn test_my_games_excludes_completed_and_missing_games() {
        let fixture = fixture();
        seed_user(&fixture, "host-1", Some("Hosty"), ROLE_ANONYMOUS).await;

        // A live game the user hosts.
        let live = fixture.service.create_game("host-1", None).await.unwrap();

        // A completed game the user is seated in.
        let done = fixture
            .games
            .create_game(NewGame {
                name: "Done".to_string(),
                host_id: "host-1".to_string(),
                status: GameStatus::Completed,
                max_players: 4,
                current_battle_number: 3,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        fixture
            .players
            .create_player(NewPlayer::joining(&done.id, "host-1", 1, false))
            .await
            .unwrap();

        // A dangling seat whose Game row no longer exists.
        fixture
            .players
            .create_player(NewPlayer::joining("vanished-game", "host-1", 2, false))
            .await
            .unwrap();

        let rows = fixture.assembler.my_games("host-1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, live.id);
        assert!(rows[0].is_host);
        assert_eq!(rows[0].my_player_number, 1);
    }

    #[tokio::test]
    async fn test_my_games_empty_without_participations() {
        let fixture = fixture();

        let rows = fixture.assembler.my_games("nobody").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_my_games_marks_joined_games_not_hosted() {
        let fixture = fixture();
        seed_user(&fixture, "host-1", Some("Hosty"), ROLE_ANONYMOUS).await;

        let created = fixture.service.create_game("host-1", None).await.unwrap();
        fixture.service.join_game(&created.id, "user-2").await.unwrap();

        let rows = fixture.assembler.my_games("user-2").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_host);
        assert_eq!(rows[0].my_player_number, 2);
        assert_eq!(rows[0].host_name, "Hosty");
    }

    #[tokio::test]
    async fn test_game_lobby_sorts_seats_and_flags_npcs() {
        let fixture = fixture();
        seed_user(&fixture, "host-1", Some("Hosty"), ROLE_ANONYMOUS).await;
        seed_user(&fixture, "npc-1", Some("Alice"), ROLE_NPC).await;

        let created = fixture.service.create_game("host-1", None).await.unwrap();
        fixture
            .service
            .add_npc_to_game(&created.id, "npc-1", 2)
            .await
            .unwrap();

        let lobby = fixture.assembler.game_lobby(&created.id).await.unwrap();
        assert_eq!(lobby.code, created.code);
        assert_eq!(lobby.players.len(), 2);

        let numbers: Vec<i32> = lobby.players.iter().map(|p| p.player_number).collect();
        assert_eq!(numbers, vec![1, 2]);

        let host_seat = &lobby.players[0];
        assert_eq!(host_seat.display_name, "Hosty");
        assert!(!host_seat.is_npc);
        assert!(!host_seat.is_ready);

        let npc_seat = &lobby.players[1];
        assert_eq!(npc_seat.display_name, "Alice");
        assert!(npc_seat.is_npc);
        assert!(npc_seat.is_ready);
    }

    #[tokio::test]
    async fn test_game_lobby_missing_game_is_an_error() {
        let fixture = fixture();

        let result = fixture.assembler.game_lobby("missing-game").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_npc_roster_sorted_with_fallback_names() {
        let fixture = fixture();
        seed_user(&fixture, "npc-z", Some("Zelda"), ROLE_NPC).await;
        seed_user(&fixture, "npc-a", Some("Alice"), ROLE_NPC).await;
        seed_user(&fixture, "npc-blank", None, ROLE_NPC).await;
        seed_user(&fixture, "human", Some("Hank"), ROLE_ANONYMOUS).await;

        let roster = fixture.assembler.npc_roster().await.unwrap();
        let names: Vec<&str> = roster.iter().map(|n| n.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", UNKNOWN_NPC_NAME, "Zelda"]);
        assert!(roster.iter().all(|n| n.rating == DEFAULT_RATING));
    }
}
