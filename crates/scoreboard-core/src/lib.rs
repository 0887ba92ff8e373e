pub mod matchup;
pub mod protocol;
pub mod tally;

pub use matchup::{GameSubmission, InvalidInput, Matchup, Seat};
pub use protocol::{
    BatchItemResult, BatchOutcome, ErrorBody, Game, Leaderboard, Player, PlayerStanding,
    RegisterPlayer, Team, TeamStanding,
};
pub use tally::{Tally, credits_teams};

/// Teams created at start-up if absent.
pub const SEED_TEAMS: [&str; 2] = ["tiger", "wolf"];
