use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use scoreboard_core::{ErrorBody, InvalidInput};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("username {0:?} is already taken")]
    DuplicateUsername(String),
    #[error("challenge {challenge} between players {player1_id} and {player2_id} is already recorded")]
    DuplicateGame {
        challenge: i64,
        player1_id: i64,
        player2_id: i64,
    },
    #[error("no player with id {0}")]
    UnknownPlayer(i64),
    #[error("no team named {0:?}")]
    InvalidTeam(String),
    #[error(transparent)]
    MalformedInput(#[from] InvalidInput),
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Translate a store error, turning constraint failures into
    /// `ConstraintViolation`.
    pub fn from_store(err: sqlx::Error) -> Self {
        match constraint_message(&err) {
            Some(message) => AppError::ConstraintViolation(message),
            None => AppError::Database(err),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DuplicateUsername(_) => "duplicate_username",
            AppError::DuplicateGame { .. } => "duplicate_game",
            AppError::UnknownPlayer(_) => "unknown_player",
            AppError::InvalidTeam(_) => "invalid_team",
            AppError::MalformedInput(_) => "malformed_input",
            AppError::ConstraintViolation(_) => "constraint_violation",
            AppError::NotFound(_) => "not_found",
            AppError::Database(_) => "database",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername(_)
            | AppError::DuplicateGame { .. }
            | AppError::ConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::UnknownPlayer(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTeam(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "request rejected");
        }
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// The database's message when `err` is a UNIQUE or CHECK failure.
pub(crate) fn constraint_message(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
            Some(db.message().to_string())
        }
        _ => None,
    }
}

/// True when `err` is a UNIQUE failure on the given `table.column`.
pub(crate) fn is_unique_violation_on(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation() && db.message().contains(column),
        _ => false,
    }
}
