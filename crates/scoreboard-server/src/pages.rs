use maud::{DOCTYPE, Markup, html};

use scoreboard_core::{Leaderboard, Team};

/// Banner shown above the leaderboard after a form registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// Human-readable text for an error kind carried back in a redirect.
pub fn error_message(kind: &str) -> &'static str {
    match kind {
        "duplicate_username" => "That username is already taken.",
        "invalid_team" => "Pick one of the listed teams.",
        "malformed_input" => "Please fill in a name and a team.",
        "constraint_violation" => "That device is already registered.",
        _ => "Registration failed, please try again.",
    }
}

pub fn leaderboard_page(board: &Leaderboard, teams: &[Team], flash: Option<&Flash>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Leaderboard" }
            }
            body {
                h1 { "Leaderboard" }

                @match flash {
                    Some(Flash::Success(msg)) => {
                        p class="flash success" { (msg) }
                    }
                    Some(Flash::Error(msg)) => {
                        p class="flash error" { (msg) }
                    }
                    None => {}
                }

                h2 { "Teams" }
                table class="teams" {
                    tr { th { "#" } th { "Team" } th { "Won" } th { "Lost" } th { "Played" } }
                    @for team in &board.teams {
                        tr {
                            td { (team.rank) }
                            td { (team.name) }
                            td { (team.games_won) }
                            td { (team.games_lost) }
                            td { (team.games_played) }
                        }
                    }
                }

                h2 { "Players" }
                @if board.players.is_empty() {
                    p { "No players yet." }
                } @else {
                    table class="players" {
                        tr { th { "#" } th { "Player" } th { "Team" } th { "Won" } th { "Lost" } th { "Played" } }
                        @for player in &board.players {
                            tr {
                                td { (player.rank) }
                                td { (player.username) }
                                td { (player.team) }
                                td { (player.games_won) }
                                td { (player.games_lost) }
                                td { (player.games_played) }
                            }
                        }
                    }
                }

                h2 { "Join" }
                form method="post" action="/players/form" {
                    label { "Name " input type="text" name="name" required; }
                    label { " Badge id " input type="text" name="mac_or_id"; }
                    label {
                        " Team "
                        select name="team" {
                            @for team in teams {
                                option value=(team.name) { (team.name) }
                            }
                        }
                    }
                    " "
                    button type="submit" { "Register" }
                }
            }
        }
    }
}
