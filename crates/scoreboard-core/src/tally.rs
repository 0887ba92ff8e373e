use serde::{Deserialize, Serialize};

/// Running totals kept on both players and teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub games_played: i64,
    pub games_won: i64,
}

impl Tally {
    pub fn new(games_played: i64, games_won: i64) -> Self {
        Tally {
            games_played,
            games_won,
        }
    }

    /// The totals after one more game.
    pub fn record(self, won: bool) -> Tally {
        Tally {
            games_played: self.games_played + 1,
            games_won: self.games_won + i64::from(won),
        }
    }

    pub fn games_lost(&self) -> i64 {
        self.games_played - self.games_won
    }
}

/// A team never plays itself: team totals only move when the two players
/// come from different teams.
pub fn credits_teams(team_a: i64, team_b: i64) -> bool {
    team_a != team_b
}
