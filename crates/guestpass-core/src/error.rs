//! Error types for the guestpass system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuestpassError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Could not generate account credentials: {0}")]
    CredentialGeneration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GuestpassResult<T> = Result<T, GuestpassError>;
