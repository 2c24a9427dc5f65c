use std::collections::HashSet;
use tracing::{info, instrument};

use crate::game::models::GamePlayer;
use crate::game::repository::PlayerRepository;
use crate::shared::AppError;

/// Outcome of a duplicate-seat cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub scanned: usize,
    pub duplicates: usize,
    pub deleted: usize,
}

/// Rows that share a (gameId, userId) pair with an earlier row, in scan
/// order. The first-seen row per pair is the one that survives.
pub fn find_duplicate_players(players: &[GamePlayer]) -> Vec<GamePlayer> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut duplicates = Vec::new();

    for player in players {
        if !seen.insert((player.game_id.as_str(), player.user_id.as_str())) {
            duplicates.push(player.clone());
        }
    }

    duplicates
}

/// Scans every membership row and deletes the duplicates per
/// (gameId, userId) pair. The backend never enforced the pair's
/// uniqueness, so duplicate seats accumulate until an operator runs this.
#[instrument(skip(players))]
pub async fn cleanup_duplicate_players(
    players: &dyn PlayerRepository,
) -> Result<CleanupReport, AppError> {
    let all = players.list_all_players().await?;
    let duplicates = find_duplicate_players(&all);

    info!(
        scanned = all.len(),
        duplicates = duplicates.len(),
        "Scanned membership rows for duplicate seats"
    );

    let mut deleted = 0;
    for duplicate in &duplicates {
        players.delete_player(&duplicate.id).await?;
        info!(
            player_id = %duplicate.id,
            game_id = %duplicate.game_id,
            user_id = %duplicate.user_id,
            "Deleted duplicate seat"
        );
        deleted += 1;
    }

    Ok(CleanupReport {
        scanned: all.len(),
        duplicates: duplicates.len(),
        deleted,
    })
}
