pub mod config;
pub mod db;
pub mod error;
pub mod pages;
pub mod registration;
pub mod routes;
pub mod scoring;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use scoreboard_core::SEED_TEAMS;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

/// Build a fully configured Router + shared state: open the pool, create
/// the schema, and seed the teams.
pub async fn build_app(config: &Config) -> Result<(Router, Arc<AppState>), AppError> {
    let pool = db::connect(config).await?;
    db::init_db(&pool).await?;
    db::seed_teams(&pool, &SEED_TEAMS).await?;

    let state = Arc::new(AppState { db: pool });

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/players", post(routes::register))
        .route("/players/form", post(routes::register_form))
        .route("/players/{id}", get(routes::player))
        .route("/teams", get(routes::teams))
        .route("/games", post(routes::record))
        .route("/games/batch", post(routes::record_batch))
        .route("/leaderboard", get(routes::leaderboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    Ok((app, state))
}
