//! Credential generation for new disposable accounts.
//!
//! Usernames are drawn from a [`UsernameSource`] and checked against
//! the account repository until a free one is found, bounded by the
//! configured attempt limit. The limit only guards against a
//! misconfigured (too small) candidate space; under concurrent writers
//! the storage layer's unique index is the actual guarantee.

use guestpass_core::error::GuestpassResult;
use guestpass_core::models::account::AccountDraft;
use guestpass_core::repository::AccountRepository;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

use crate::config::OnboardingSettings;
use crate::error::OnboardingError;

/// Produces username candidates. Implemented separately from the
/// generator so tests can script deterministic (and colliding)
/// candidate sequences.
pub trait UsernameSource: Send + Sync {
    fn candidate(&self) -> String;
}

/// Default source: configured prefix plus 4 random bytes, hex-encoded
/// (e.g. `guest-9f2ac01b`).
pub struct RandomUsernameSource {
    prefix: String,
}

impl RandomUsernameSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl UsernameSource for RandomUsernameSource {
    fn candidate(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 4] = rng.random();
        format!("{}{}", self.prefix, hex::encode(bytes))
    }
}

/// Generate a random alphanumeric plaintext password.
pub(crate) fn random_password(length: usize) -> String {
    let rng = rand::rng();
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generates unique usernames and random passwords for account drafts.
pub struct CredentialsGenerator<A: AccountRepository, N: UsernameSource = RandomUsernameSource> {
    account_repo: A,
    source: N,
    max_attempts: u32,
    password_length: usize,
    pepper: Option<String>,
}

impl<A: AccountRepository> CredentialsGenerator<A, RandomUsernameSource> {
    pub fn new(account_repo: A, settings: &OnboardingSettings, pepper: Option<String>) -> Self {
        Self::with_source(
            account_repo,
            RandomUsernameSource::new(settings.username_prefix.clone()),
            settings,
            pepper,
        )
    }
}

impl<A: AccountRepository, N: UsernameSource> CredentialsGenerator<A, N> {
    pub fn with_source(
        account_repo: A,
        source: N,
        settings: &OnboardingSettings,
        pepper: Option<String>,
    ) -> Self {
        Self {
            account_repo,
            source,
            max_attempts: settings.max_username_attempts,
            password_length: settings.password_length,
            pepper,
        }
    }

    /// Assign a username to the draft that is unused at the time of
    /// generation, retrying with fresh candidates up to the configured
    /// bound. Exhaustion is a fatal `CredentialGeneration` error.
    pub async fn generate_username(&self, draft: &mut AccountDraft) -> GuestpassResult<()> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.candidate();
            if !self.account_repo.username_exists(&candidate).await? {
                draft.username = candidate;
                return Ok(());
            }
            debug!(attempt, "username candidate already taken, retrying");
        }

        Err(OnboardingError::UsernameExhausted {
            attempts: self.max_attempts,
        }
        .into())
    }

    /// Generate a random password, store its Argon2id hash on the
    /// draft, and return the plaintext for one-time disclosure.
    ///
    /// The plaintext exists only in the returned value; it is neither
    /// persisted nor logged.
    pub fn generate_password(&self, draft: &mut AccountDraft) -> GuestpassResult<String> {
        let plaintext = random_password(self.password_length);
        draft.password_hash =
            guestpass_auth::password::hash_password(&plaintext, self.pepper.as_deref())?;
        Ok(plaintext)
    }
}
