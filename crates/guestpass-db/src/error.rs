//! Database-specific error types and conversions.

use guestpass_core::error::GuestpassError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl From<DbError> for GuestpassError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GuestpassError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => GuestpassError::AlreadyExists { entity },
            other => GuestpassError::Database(other.to_string()),
        }
    }
}
