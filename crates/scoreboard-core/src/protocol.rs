use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration request, accepted as JSON or as a form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPlayer {
    #[serde(default)]
    pub name: String,
    /// Badge MAC address or any other device identifier the player carries.
    #[serde(default)]
    pub mac_or_id: Option<String>,
    /// Team name, e.g. "tiger".
    #[serde(default)]
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub device_id: Option<String>,
    pub team_id: i64,
    pub team: String,
    pub games_played: i64,
    pub games_won: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub games_played: i64,
    pub games_won: i64,
}

/// A recorded game. `player1_id` is always the greater of the two ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub challenge: i64,
    pub player1_id: i64,
    pub player1_win: bool,
    pub player2_id: i64,
    pub player2_win: bool,
    pub initiated_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

/// Leaderboard row for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub rank: u32,
    pub id: i64,
    pub username: String,
    pub team: String,
    pub games_played: i64,
    pub games_won: i64,
    pub games_lost: i64,
}

/// Leaderboard row for a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStanding {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub games_played: i64,
    pub games_won: i64,
    pub games_lost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub players: Vec<PlayerStanding>,
    pub teams: Vec<TeamStanding>,
}

/// Per-item result of a batch recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
    Recorded {
        index: usize,
        game_id: i64,
    },
    Skipped {
        index: usize,
        error: String,
        message: String,
    },
}

impl BatchItemResult {
    pub fn index(&self) -> usize {
        match self {
            BatchItemResult::Recorded { index, .. } | BatchItemResult::Skipped { index, .. } => {
                *index
            }
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, BatchItemResult::Recorded { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub recorded: usize,
    pub skipped: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchOutcome {
    pub fn from_results(results: Vec<BatchItemResult>) -> Self {
        let recorded = results.iter().filter(|r| r.is_recorded()).count();
        BatchOutcome {
            recorded,
            skipped: results.len() - recorded,
            results,
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
