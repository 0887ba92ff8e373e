//! Game recording: the only multi-row write in the system.
//!
//! A game is validated and put in canonical order (greater player id first),
//! then inserted together with its two `game_players` rows and the new
//! player/team totals in one transaction. The game insert is the first
//! statement, so the transaction owns SQLite's write lock before any counter
//! is read and concurrent recordings cannot lose updates. Dropping the
//! transaction on an error rolls everything back.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use scoreboard_core::{
    BatchItemResult, BatchOutcome, Game, GameSubmission, Player, credits_teams,
};

use crate::db;
use crate::error::{AppError, is_unique_violation_on};

/// Record one game.
pub async fn record_game(pool: &SqlitePool, submission: GameSubmission) -> Result<Game, AppError> {
    let matchup = submission.into_matchup(Utc::now())?;
    let [seat1, seat2] = matchup.seats();

    // Players are never deleted and never change team, so these reads can
    // happen before the transaction.
    let player1 = lookup_player(pool, seat1.player_id).await?;
    let player2 = lookup_player(pool, seat2.player_id).await?;

    let recorded_at = Utc::now();
    let mut tx = pool.begin().await?;

    let game_id = match db::insert_game(&mut tx, &matchup, recorded_at).await {
        Ok(id) => id,
        Err(err) if is_unique_violation_on(&err, "games.challenge") => {
            return Err(AppError::DuplicateGame {
                challenge: matchup.challenge(),
                player1_id: seat1.player_id,
                player2_id: seat2.player_id,
            });
        }
        Err(err) => return Err(AppError::from_store(err)),
    };

    for seat in matchup.seats() {
        db::insert_game_player(&mut tx, game_id, seat).await?;
    }

    for seat in matchup.seats() {
        let tally = db::player_tally(&mut tx, seat.player_id).await?;
        db::set_player_tally(&mut tx, seat.player_id, tally.record(seat.won)).await?;
    }

    if credits_teams(player1.team_id, player2.team_id) {
        for (player, seat) in [(&player1, seat1), (&player2, seat2)] {
            let tally = db::team_tally(&mut tx, player.team_id).await?;
            db::set_team_tally(&mut tx, player.team_id, tally.record(seat.won)).await?;
        }
    }

    tx.commit().await?;

    info!(
        game_id,
        challenge = matchup.challenge(),
        player1 = %player1.username,
        player1_win = seat1.won,
        player2 = %player2.username,
        player2_win = seat2.won,
        "recorded game"
    );

    Ok(Game {
        id: game_id,
        challenge: matchup.challenge(),
        player1_id: seat1.player_id,
        player1_win: seat1.won,
        player2_id: seat2.player_id,
        player2_win: seat2.won,
        initiated_at: matchup.initiated_at(),
        recorded_at,
    })
}

/// Record a batch. Every item stands alone: a failing item is logged,
/// reported in the outcome, and the rest of the batch carries on.
pub async fn record_games(pool: &SqlitePool, items: Vec<serde_json::Value>) -> BatchOutcome {
    let mut results = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let recorded = match GameSubmission::from_value(item) {
            Ok(submission) => record_game(pool, submission).await,
            Err(err) => Err(err.into()),
        };

        results.push(match recorded {
            Ok(game) => BatchItemResult::Recorded {
                index,
                game_id: game.id,
            },
            Err(err) => {
                warn!(index, kind = err.kind(), error = %err, "skipping game in batch");
                BatchItemResult::Skipped {
                    index,
                    error: err.kind().to_string(),
                    message: err.to_string(),
                }
            }
        });
    }

    let outcome = BatchOutcome::from_results(results);
    info!(recorded = outcome.recorded, skipped = outcome.skipped, "processed game batch");
    outcome
}

async fn lookup_player(pool: &SqlitePool, id: i64) -> Result<Player, AppError> {
    db::get_player(pool, id)
        .await?
        .ok_or(AppError::UnknownPlayer(id))
}
