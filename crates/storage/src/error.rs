use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Registration deadline has passed")]
    RegistrationClosed,

    #[error("Tournament is full")]
    TournamentFull,

    #[error("Already registered for this tournament")]
    AlreadyRegistered,

    #[error("Not registered for this tournament")]
    NotRegistered,

    #[error("Admin privileges required")]
    Forbidden,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Serialization failures, deadlock aborts and dropped connections.
    /// Safe to retry for reads; mutations are rolled back and surfaced.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => {
                matches!(e.code().as_deref(), Some("40001") | Some("40P01"))
            }
            StorageError::Database(sqlx::Error::Io(_))
            | StorageError::Database(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }
}
