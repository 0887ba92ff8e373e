use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::Json;
use serde::Deserialize;

use scoreboard_core::{
    BatchOutcome, Game, GameSubmission, InvalidInput, Leaderboard, Player, RegisterPlayer, Team,
};

use crate::db;
use crate::error::AppError;
use crate::pages::{self, Flash};
use crate::registration;
use crate::scoring;
use crate::state::AppState;

// ── Health ──────────────────────────────────────────────────────────────

pub async fn health() -> &'static str {
    "ok"
}

// ── Players ─────────────────────────────────────────────────────────────

/// Raw JSON body, like `record`, so a mistyped field is `malformed_input`.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let req: RegisterPlayer = serde_json::from_value(body)
        .map_err(|e| InvalidInput::Unreadable(e.to_string()))?;
    let player = registration::register_player(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Form registration from the leaderboard page. The outcome travels back
/// to `/` in the query string.
pub async fn register_form(
    State(state): State<Arc<AppState>>,
    Form(req): Form<RegisterPlayer>,
) -> Redirect {
    match registration::register_player(&state.db, req).await {
        Ok(player) => Redirect::to(&format!("/?registered={}", player.id)),
        Err(err) => {
            tracing::debug!(error = %err, "form registration rejected");
            Redirect::to(&format!("/?error={}", err.kind()))
        }
    }
}

pub async fn player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Player>, AppError> {
    let player = db::get_player(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("player {id}")))?;
    Ok(Json(player))
}

pub async fn teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>, AppError> {
    Ok(Json(db::list_teams(&state.db).await?))
}

// ── Games ───────────────────────────────────────────────────────────────

/// The body is taken as raw JSON so a missing or mistyped field comes back
/// as `malformed_input` rather than the extractor's generic rejection.
pub async fn record(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    let submission = GameSubmission::from_value(body)?;
    let game = scoring::record_game(&state.db, submission).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Items are parsed one by one; only a body that is not an array fails as
/// a whole.
pub async fn record_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<BatchOutcome>, AppError> {
    let serde_json::Value::Array(items) = body else {
        return Err(InvalidInput::Unreadable("expected a JSON array of games".into()).into());
    };
    Ok(Json(scoring::record_games(&state.db, items).await))
}

// ── Leaderboard ─────────────────────────────────────────────────────────

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Leaderboard>, AppError> {
    Ok(Json(db::leaderboard(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub registered: Option<i64>,
    pub error: Option<String>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let board = db::leaderboard(&state.db).await?;
    let teams = db::list_teams(&state.db).await?;

    let flash = match (query.registered, query.error) {
        (Some(id), _) => db::get_player(&state.db, id).await?.map(|p| {
            Flash::Success(format!("Welcome, {}! You're on team {}.", p.username, p.team))
        }),
        (None, Some(kind)) => Some(Flash::Error(pages::error_message(&kind).to_string())),
        (None, None) => None,
    };

    let page = pages::leaderboard_page(&board, &teams, flash.as_ref());
    Ok(Html(page.into_string()))
}
