//! Session activation for freshly created accounts.

use guestpass_auth::config::AuthConfig;
use guestpass_auth::service::AuthService;
use guestpass_core::error::GuestpassResult;
use guestpass_core::models::account::Account;
use guestpass_core::repository::{AccountRepository, SessionRepository};
use uuid::Uuid;

/// Session data key marking a session as belonging to a disposable
/// account. This marker is the only durable evidence of the one-time
/// origin; everything else about the session is ordinary.
pub const ONE_TIME_ACCOUNT_KEY: &str = "onetime_account";

/// An established, marked session.
#[derive(Debug)]
pub struct ActivatedSession {
    pub session_id: Uuid,
    /// Raw opaque session token for the client.
    pub session_token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// Logs a freshly created account in and marks the session as
/// originating from the disposable-account flow.
pub struct SessionActivator<A: AccountRepository, S: SessionRepository + Clone> {
    auth: AuthService<A, S>,
    session_repo: S,
}

impl<A: AccountRepository, S: SessionRepository + Clone> SessionActivator<A, S> {
    pub fn new(account_repo: A, session_repo: S, config: AuthConfig) -> Self {
        Self {
            auth: AuthService::new(account_repo, session_repo.clone(), config),
            session_repo,
        }
    }

    /// Establish an authenticated session for the account using its
    /// just-generated plaintext password (verification against the
    /// stored hash is the auth service's job), then set the one-time
    /// marker in the session's data store.
    pub async fn activate(
        &self,
        account: &Account,
        plaintext_password: &str,
    ) -> GuestpassResult<ActivatedSession> {
        let login = self.auth.login_as(account, plaintext_password).await?;

        self.session_repo
            .set_data(
                login.session_id,
                ONE_TIME_ACCOUNT_KEY,
                serde_json::Value::Bool(true),
            )
            .await?;

        Ok(ActivatedSession {
            session_id: login.session_id,
            session_token: login.session_token,
            expires_in: login.expires_in,
        })
    }
}
