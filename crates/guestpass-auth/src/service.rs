//! Authentication service — session establishment and teardown.

use chrono::{Duration, Utc};
use guestpass_core::error::GuestpassResult;
use guestpass_core::models::account::Account;
use guestpass_core::models::session::CreateSession;
use guestpass_core::repository::{AccountRepository, SessionRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Session ID (can be used for logout and session data access).
    pub session_id: Uuid,
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<A: AccountRepository, S: SessionRepository> {
    account_repo: A,
    session_repo: S,
    config: AuthConfig,
}

impl<A: AccountRepository, S: SessionRepository> AuthService<A, S> {
    pub fn new(account_repo: A, session_repo: S, config: AuthConfig) -> Self {
        Self {
            account_repo,
            session_repo,
            config,
        }
    }

    /// Establish a session for an already-loaded account.
    ///
    /// The plaintext is still verified against the stored hash before
    /// a session is created, but no account lookup round-trip is
    /// performed. Used both by a regular credential login (after the
    /// caller resolves the username) and by the onboarding auto-login,
    /// which holds the freshly created account.
    pub async fn login_as(&self, account: &Account, password: &str) -> GuestpassResult<LoginOutput> {
        let valid = password::verify_password(
            password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                account_id: account.id,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(LoginOutput {
            session_id: session.id,
            session_token: raw_token,
            expires_in: self.config.session_lifetime_secs,
        })
    }

    /// Authenticate by username + password and establish a session.
    pub async fn login(&self, username: &str, password: &str) -> GuestpassResult<LoginOutput> {
        let account = self
            .account_repo
            .find_by_username(username)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.login_as(&account, password).await
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> GuestpassResult<()> {
        self.session_repo.invalidate(session_id).await
    }
}
