use sqlx::SqlitePool;

/// Shared application state. The pool is the only shared mutable resource;
/// every request borrows connections from it.
pub struct AppState {
    pub db: SqlitePool,
}
