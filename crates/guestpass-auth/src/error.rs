//! Authentication error types.

use guestpass_core::error::GuestpassError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for GuestpassError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::SessionExpired => {
                GuestpassError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => GuestpassError::Crypto(msg),
        }
    }
}
