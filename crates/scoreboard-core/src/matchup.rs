use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for a registration or game submission that cannot be
/// interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("challenge must be non-negative, got {0}")]
    NegativeChallenge(i64),
    #[error("player {0} cannot play against themself")]
    SelfMatch(i64),
    #[error("unreadable submission: {0}")]
    Unreadable(String),
}

/// Raw game submission as it arrives over the wire. Every field is optional
/// here so that a missing one is reported by name instead of failing the
/// whole request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSubmission {
    pub challenge: Option<i64>,
    pub player1_id: Option<i64>,
    pub player1_win: Option<bool>,
    pub player2_id: Option<i64>,
    pub player2_win: Option<bool>,
    pub initiated_at: Option<DateTime<Utc>>,
}

impl GameSubmission {
    pub fn from_value(value: serde_json::Value) -> Result<Self, InvalidInput> {
        serde_json::from_value(value).map_err(|e| InvalidInput::Unreadable(e.to_string()))
    }

    /// Validate and canonicalize. `now` stands in for a missing `initiated_at`.
    pub fn into_matchup(self, now: DateTime<Utc>) -> Result<Matchup, InvalidInput> {
        let challenge = self.challenge.ok_or(InvalidInput::Missing("challenge"))?;
        let a = Seat {
            player_id: self.player1_id.ok_or(InvalidInput::Missing("player1_id"))?,
            won: self.player1_win.ok_or(InvalidInput::Missing("player1_win"))?,
        };
        let b = Seat {
            player_id: self.player2_id.ok_or(InvalidInput::Missing("player2_id"))?,
            won: self.player2_win.ok_or(InvalidInput::Missing("player2_win"))?,
        };
        Matchup::new(challenge, a, b, self.initiated_at.unwrap_or(now))
    }
}

/// One side of a game: who played and whether they won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: i64,
    pub won: bool,
}

/// A validated game in canonical order: `player1.player_id` is strictly
/// greater than `player2.player_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    challenge: i64,
    player1: Seat,
    player2: Seat,
    initiated_at: DateTime<Utc>,
}

impl Matchup {
    pub fn new(
        challenge: i64,
        a: Seat,
        b: Seat,
        initiated_at: DateTime<Utc>,
    ) -> Result<Self, InvalidInput> {
        if challenge < 0 {
            return Err(InvalidInput::NegativeChallenge(challenge));
        }
        if a.player_id == b.player_id {
            return Err(InvalidInput::SelfMatch(a.player_id));
        }
        // Id and win flag travel together.
        let (player1, player2) = if a.player_id > b.player_id { (a, b) } else { (b, a) };
        Ok(Matchup {
            challenge,
            player1,
            player2,
            initiated_at,
        })
    }

    pub fn challenge(&self) -> i64 {
        self.challenge
    }

    pub fn player1(&self) -> Seat {
        self.player1
    }

    pub fn player2(&self) -> Seat {
        self.player2
    }

    pub fn seats(&self) -> [Seat; 2] {
        [self.player1, self.player2]
    }

    pub fn initiated_at(&self) -> DateTime<Utc> {
        self.initiated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    fn seat(player_id: i64, won: bool) -> Seat {
        Seat { player_id, won }
    }

    #[test]
    fn greater_id_takes_player1() {
        let m = Matchup::new(1, seat(3, true), seat(9, false), at()).unwrap();
        assert_eq!(m.player1(), seat(9, false));
        assert_eq!(m.player2(), seat(3, true));
    }

    #[test]
    fn already_canonical_is_untouched() {
        let m = Matchup::new(1, seat(9, true), seat(3, false), at()).unwrap();
        assert_eq!(m.player1(), seat(9, true));
        assert_eq!(m.player2(), seat(3, false));
    }

    #[test]
    fn submission_order_does_not_matter() {
        let ab = Matchup::new(4, seat(5, true), seat(2, false), at()).unwrap();
        let ba = Matchup::new(4, seat(2, false), seat(5, true), at()).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn self_match_rejected() {
        let err = Matchup::new(1, seat(4, true), seat(4, false), at()).unwrap_err();
        assert_eq!(err, InvalidInput::SelfMatch(4));
    }

    #[test]
    fn negative_challenge_rejected() {
        let err = Matchup::new(-2, seat(1, true), seat(2, false), at()).unwrap_err();
        assert_eq!(err, InvalidInput::NegativeChallenge(-2));
    }

    #[test]
    fn missing_field_is_named() {
        let sub = GameSubmission {
            challenge: Some(1),
            player1_id: Some(1),
            player1_win: Some(true),
            player2_id: None,
            player2_win: Some(false),
            initiated_at: None,
        };
        assert_eq!(
            sub.into_matchup(at()).unwrap_err(),
            InvalidInput::Missing("player2_id")
        );
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let sub = GameSubmission::from_value(serde_json::json!({
            "challenge": 2,
            "player1_id": 1,
            "player1_win": false,
            "player2_id": 8,
            "player2_win": true
        }))
        .unwrap();
        let m = sub.into_matchup(at()).unwrap();
        assert_eq!(m.initiated_at(), at());
        assert_eq!(m.player1(), seat(8, true));
    }

    #[test]
    fn wrong_types_are_unreadable() {
        let err = GameSubmission::from_value(serde_json::json!({"challenge": "one"})).unwrap_err();
        assert!(matches!(err, InvalidInput::Unreadable(_)));
    }
}
