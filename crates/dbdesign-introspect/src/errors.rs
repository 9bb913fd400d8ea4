use thiserror::Error;

/// Errors raised by a database session.
///
/// User-facing variants carry the German messages shown by the front end.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failure reported by SQLite; the message is passed through unchanged.
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("Keine Datenbank geladen.")]
    NoDatabase,
    #[error("Bitte eine SQL-Abfrage eingeben.")]
    EmptyQuery,
}

/// Result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
