use chrono::{Duration, Utc};

use titan_lobby::game::models::{Game, GameStatus};
use titan_lobby::game::repository::NewGame;
use titan_lobby::user::models::{User, DEFAULT_RATING, ROLE_ANONYMOUS};
use titan_lobby::{AppContext, GameRepository, UserRepository};

// ============================================================================
// Row Builders
// ============================================================================

/// Seeds an anonymous-role user with a display name.
pub async fn seed_user(context: &AppContext, id: &str, display_name: &str) -> User {
    let now = Utc::now();
    context
        .users
        .create_user(&User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            first_name: Some(display_name.to_string()),
            last_name: None,
            display_name: Some(display_name.to_string()),
            role: ROLE_ANONYMOUS,
            rating: DEFAULT_RATING,
            created_at: Some(now),
            updated_at: Some(now),
        })
        .await
        .expect("failed to seed user")
}

/// Creates a game row directly, bypassing the service, with a creation
/// time offset into the past so ordering tests stay deterministic.
pub async fn game_with_status(
    context: &AppContext,
    name: &str,
    host_id: &str,
    status: GameStatus,
    age_minutes: i64,
) -> Game {
    context
        .games
        .create_game(NewGame {
            name: name.to_string(),
            host_id: host_id.to_string(),
            status,
            max_players: 4,
            current_battle_number: 0,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        })
        .await
        .expect("failed to seed game")
}
