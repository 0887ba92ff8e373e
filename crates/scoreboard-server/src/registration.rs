use chrono::Utc;
use sqlx::SqlitePool;

use scoreboard_core::{InvalidInput, Player, RegisterPlayer};

use crate::db;
use crate::error::{AppError, is_unique_violation_on};

/// Register a new player with zeroed counters.
///
/// Team names are matched case-insensitively against the seeded teams.
/// Username uniqueness rests on the UNIQUE constraint, so two concurrent
/// registrations of one name cannot both succeed.
pub async fn register_player(
    pool: &SqlitePool,
    request: RegisterPlayer,
) -> Result<Player, AppError> {
    let username = request.name.trim();
    if username.is_empty() {
        return Err(InvalidInput::Missing("name").into());
    }
    let team_name = request.team.trim().to_lowercase();
    if team_name.is_empty() {
        return Err(InvalidInput::Missing("team").into());
    }
    let device_id = request
        .mac_or_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let team = db::get_team_by_name(pool, &team_name)
        .await?
        .ok_or_else(|| AppError::InvalidTeam(team_name.clone()))?;

    let id = match db::insert_player(pool, username, device_id, team.id, Utc::now()).await {
        Ok(id) => id,
        Err(err) if is_unique_violation_on(&err, "players.username") => {
            return Err(AppError::DuplicateUsername(username.to_string()));
        }
        Err(err) => return Err(AppError::from_store(err)),
    };

    tracing::info!(player_id = id, username, team = %team.name, "registered player");

    db::get_player(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("player {id}")))
}
