use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};

use scoreboard_core::{
    Game, Leaderboard, Matchup, Player, PlayerStanding, Seat, Tally, Team, TeamStanding,
};

use crate::config::Config;

/// Open the pool described by `config`.
///
/// SQLite gives every connection its own in-memory database, so a
/// `:memory:` URL gets a single connection that is never recycled.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .foreign_keys(true)
        .busy_timeout(config.db_busy_timeout);

    if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(
                options
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await
    }
}

/// Create all tables if they don't exist.
pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            games_played INTEGER NOT NULL DEFAULT 0,
            games_won INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            device_id TEXT UNIQUE,
            team_id INTEGER NOT NULL,
            games_played INTEGER NOT NULL DEFAULT 0,
            games_won INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (team_id) REFERENCES teams(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY,
            challenge INTEGER NOT NULL,
            player1_id INTEGER NOT NULL,
            player1_win INTEGER NOT NULL,
            player2_id INTEGER NOT NULL,
            player2_win INTEGER NOT NULL,
            initiated_at TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (player1_id) REFERENCES players(id),
            FOREIGN KEY (player2_id) REFERENCES players(id),
            CHECK (player1_id > player2_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS games_challenge_pair
         ON games (challenge, player1_id, player2_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS game_players (
            game_id INTEGER NOT NULL,
            player_id INTEGER NOT NULL,
            won INTEGER NOT NULL,
            PRIMARY KEY (game_id, player_id),
            FOREIGN KEY (game_id) REFERENCES games(id),
            FOREIGN KEY (player_id) REFERENCES players(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS game_players_player ON game_players (player_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert each named team unless it already exists.
pub async fn seed_teams(pool: &SqlitePool, names: &[&str]) -> Result<(), sqlx::Error> {
    for name in names {
        sqlx::query("INSERT INTO teams (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

// ── Teams ───────────────────────────────────────────────────────────────

const TEAM_COLUMNS: &str = "id, name, games_played, games_won";

fn team_from_row(r: &SqliteRow) -> Team {
    Team {
        id: r.get("id"),
        name: r.get("name"),
        games_played: r.get("games_played"),
        games_won: r.get("games_won"),
    }
}

pub async fn get_team(pool: &SqlitePool, id: i64) -> Result<Option<Team>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(team_from_row))
}

pub async fn get_team_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Team>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE name = ?1"))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(team_from_row))
}

/// All teams in creation order.
pub async fn list_teams(pool: &SqlitePool) -> Result<Vec<Team>, sqlx::Error> {
    let rows = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(team_from_row).collect())
}

// ── Players ─────────────────────────────────────────────────────────────

const PLAYER_SELECT: &str = "SELECT p.id, p.username, p.device_id, p.team_id, t.name AS team,
        p.games_played, p.games_won, p.created_at
    FROM players p JOIN teams t ON t.id = p.team_id";

fn player_from_row(r: &SqliteRow) -> Player {
    Player {
        id: r.get("id"),
        username: r.get("username"),
        device_id: r.get("device_id"),
        team_id: r.get("team_id"),
        team: r.get("team"),
        games_played: r.get("games_played"),
        games_won: r.get("games_won"),
        created_at: r.get("created_at"),
    }
}

/// Insert a player with zeroed counters. Returns the new id.
///
/// Fails with a UNIQUE violation on `players.username` or
/// `players.device_id`; callers translate those.
pub async fn insert_player(
    pool: &SqlitePool,
    username: &str,
    device_id: Option<&str>,
    team_id: i64,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO players (username, device_id, team_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(username)
    .bind(device_id)
    .bind(team_id)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_player(pool: &SqlitePool, id: i64) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query(&format!("{PLAYER_SELECT} WHERE p.id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(player_from_row))
}

pub async fn get_player_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query(&format!("{PLAYER_SELECT} WHERE p.username = ?1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(player_from_row))
}

// ── Games ───────────────────────────────────────────────────────────────

const GAME_COLUMNS: &str = "g.id, g.challenge, g.player1_id, g.player1_win, g.player2_id,
    g.player2_win, g.initiated_at, g.recorded_at";

fn game_from_row(r: &SqliteRow) -> Game {
    Game {
        id: r.get("id"),
        challenge: r.get("challenge"),
        player1_id: r.get("player1_id"),
        player1_win: r.get("player1_win"),
        player2_id: r.get("player2_id"),
        player2_win: r.get("player2_win"),
        initiated_at: r.get("initiated_at"),
        recorded_at: r.get("recorded_at"),
    }
}

/// Insert a canonical game. Returns the new id.
///
/// A UNIQUE violation here means the same challenge between the same pair
/// is already recorded.
pub async fn insert_game(
    conn: &mut SqliteConnection,
    matchup: &Matchup,
    recorded_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO games (challenge, player1_id, player1_win, player2_id, player2_win, initiated_at, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(matchup.challenge())
    .bind(matchup.player1().player_id)
    .bind(matchup.player1().won)
    .bind(matchup.player2().player_id)
    .bind(matchup.player2().won)
    .bind(matchup.initiated_at())
    .bind(recorded_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_game_player(
    conn: &mut SqliteConnection,
    game_id: i64,
    seat: Seat,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO game_players (game_id, player_id, won) VALUES (?1, ?2, ?3)")
        .bind(game_id)
        .bind(seat.player_id)
        .bind(seat.won)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn get_game(pool: &SqlitePool, id: i64) -> Result<Option<Game>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(game_from_row))
}

/// Look a game up by its canonical key.
pub async fn find_game(
    pool: &SqlitePool,
    challenge: i64,
    player1_id: i64,
    player2_id: i64,
) -> Result<Option<Game>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {GAME_COLUMNS} FROM games g
         WHERE g.challenge = ?1 AND g.player1_id = ?2 AND g.player2_id = ?3"
    ))
    .bind(challenge)
    .bind(player1_id)
    .bind(player2_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(game_from_row))
}

/// Every game a player took part in, oldest first.
pub async fn games_for_player(pool: &SqlitePool, player_id: i64) -> Result<Vec<Game>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {GAME_COLUMNS} FROM game_players gp
         JOIN games g ON g.id = gp.game_id
         WHERE gp.player_id = ?1
         ORDER BY g.id"
    ))
    .bind(player_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(game_from_row).collect())
}

// ── Counters ────────────────────────────────────────────────────────────
//
// These run inside the recording transaction, after the game insert has
// taken the write lock.

pub async fn player_tally(conn: &mut SqliteConnection, id: i64) -> Result<Tally, sqlx::Error> {
    let row = sqlx::query("SELECT games_played, games_won FROM players WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(Tally::new(row.get("games_played"), row.get("games_won")))
}

pub async fn set_player_tally(
    conn: &mut SqliteConnection,
    id: i64,
    tally: Tally,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE players SET games_played = ?1, games_won = ?2 WHERE id = ?3")
        .bind(tally.games_played)
        .bind(tally.games_won)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn team_tally(conn: &mut SqliteConnection, id: i64) -> Result<Tally, sqlx::Error> {
    let row = sqlx::query("SELECT games_played, games_won FROM teams WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(Tally::new(row.get("games_played"), row.get("games_won")))
}

pub async fn set_team_tally(
    conn: &mut SqliteConnection,
    id: i64,
    tally: Tally,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE teams SET games_played = ?1, games_won = ?2 WHERE id = ?3")
        .bind(tally.games_played)
        .bind(tally.games_won)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// ── Leaderboard ─────────────────────────────────────────────────────────

/// All players by wins, ties in registration order.
pub async fn player_standings(
    conn: &mut SqliteConnection,
) -> Result<Vec<PlayerStanding>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT p.id, p.username, t.name AS team, p.games_played, p.games_won
         FROM players p JOIN teams t ON t.id = p.team_id
         ORDER BY p.games_won DESC, p.id ASC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let tally = Tally::new(r.get("games_played"), r.get("games_won"));
            PlayerStanding {
                rank: (i + 1) as u32,
                id: r.get("id"),
                username: r.get("username"),
                team: r.get("team"),
                games_played: tally.games_played,
                games_won: tally.games_won,
                games_lost: tally.games_lost(),
            }
        })
        .collect())
}

/// All teams by wins, ties in creation order.
pub async fn team_standings(
    conn: &mut SqliteConnection,
) -> Result<Vec<TeamStanding>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM teams ORDER BY games_won DESC, id ASC"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(team_from_row)
        .enumerate()
        .map(|(i, team)| {
            let tally = Tally::new(team.games_played, team.games_won);
            TeamStanding {
                rank: (i + 1) as u32,
                id: team.id,
                name: team.name,
                games_played: tally.games_played,
                games_won: tally.games_won,
                games_lost: tally.games_lost(),
            }
        })
        .collect())
}

/// Both scans share one read transaction, so a game committed in between
/// shows up in both lists or in neither.
pub async fn leaderboard(pool: &SqlitePool) -> Result<Leaderboard, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let players = player_standings(&mut tx).await?;
    let teams = team_standings(&mut tx).await?;
    tx.commit().await?;
    Ok(Leaderboard { players, teams })
}
