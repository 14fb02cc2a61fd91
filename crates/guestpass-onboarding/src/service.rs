//! The account creation workflow.
//!
//! Both plugin variants of the original flow (auto-login and deferred
//! login) share everything up to the final step; the difference is
//! expressed as a [`CompletionMode`] parameter rather than two
//! workflows.

use guestpass_auth::config::AuthConfig;
use guestpass_core::error::{GuestpassError, GuestpassResult};
use guestpass_core::models::account::{Account, AccountDraft};
use guestpass_core::repository::{AccountRepository, GroupRepository, SessionRepository};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::activator::{ActivatedSession, SessionActivator};
use crate::config::OnboardingSettings;
use crate::escape::escape_html;
use crate::generator::{CredentialsGenerator, RandomUsernameSource, UsernameSource};
use crate::validator::{self, FieldError};

/// What happens after the account has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Log the visitor in immediately and mark the session.
    AutoLogin,
    /// Show the generated credentials once; no session is created.
    DisplayCredentials,
}

/// Result of a creation attempt.
#[derive(Debug)]
pub enum CreationOutcome {
    /// No submission was present. Nothing was validated or persisted;
    /// the caller re-renders its idle state.
    Idle,
    /// The submission failed validation; field errors for the form.
    Rejected(Vec<FieldError>),
    /// Account created and session established (auto-login variant).
    LoggedIn {
        account: Account,
        session: ActivatedSession,
    },
    /// Account created; credentials rendered for one-time display
    /// (deferred-login variant).
    CredentialsIssued {
        account: Account,
        confirmation_html: String,
    },
}

/// Orchestrates validation, enrichment, persistence, and completion
/// for new disposable accounts.
pub struct OnboardingService<A, G, S, N = RandomUsernameSource>
where
    A: AccountRepository + Clone,
    G: GroupRepository,
    S: SessionRepository + Clone,
    N: UsernameSource,
{
    account_repo: A,
    group_repo: G,
    generator: CredentialsGenerator<A, N>,
    activator: SessionActivator<A, S>,
    settings: OnboardingSettings,
}

impl<A, G, S> OnboardingService<A, G, S, RandomUsernameSource>
where
    A: AccountRepository + Clone,
    G: GroupRepository,
    S: SessionRepository + Clone,
{
    pub fn new(
        account_repo: A,
        group_repo: G,
        session_repo: S,
        settings: OnboardingSettings,
        auth_config: AuthConfig,
    ) -> Self {
        let generator = CredentialsGenerator::new(
            account_repo.clone(),
            &settings,
            auth_config.pepper.clone(),
        );
        let activator = SessionActivator::new(account_repo.clone(), session_repo, auth_config);
        Self {
            account_repo,
            group_repo,
            generator,
            activator,
            settings,
        }
    }
}

impl<A, G, S, N> OnboardingService<A, G, S, N>
where
    A: AccountRepository + Clone,
    G: GroupRepository,
    S: SessionRepository + Clone,
    N: UsernameSource,
{
    /// Like [`OnboardingService::new`] but with an explicit username
    /// source, so tests can script candidate sequences.
    pub fn with_username_source(
        account_repo: A,
        group_repo: G,
        session_repo: S,
        source: N,
        settings: OnboardingSettings,
        auth_config: AuthConfig,
    ) -> Self {
        let generator = CredentialsGenerator::with_source(
            account_repo.clone(),
            source,
            &settings,
            auth_config.pepper.clone(),
        );
        let activator = SessionActivator::new(account_repo.clone(), session_repo, auth_config);
        Self {
            account_repo,
            group_repo,
            generator,
            activator,
            settings,
        }
    }

    /// Produce the draft backing the creation form: the provided one,
    /// or a fresh empty draft. No side effects.
    pub fn new_form(&self, draft: Option<AccountDraft>) -> AccountDraft {
        draft.unwrap_or_default()
    }

    /// Create and persist a new disposable account from a form
    /// submission, then complete according to `mode`.
    ///
    /// `submission` is optional because an unrelated form on the same
    /// page may post to this handler without a fresh submission; that
    /// case is a deliberate no-op, not an error.
    pub async fn create(
        &self,
        submission: Option<AccountDraft>,
        mode: CompletionMode,
    ) -> GuestpassResult<CreationOutcome> {
        let Some(mut draft) = submission else {
            return Ok(CreationOutcome::Idle);
        };

        if let Err(errors) = validator::validate(&draft, &self.settings) {
            return Ok(CreationOutcome::Rejected(errors));
        }

        let plaintext = match self.enrich(&mut draft).await {
            Ok(plaintext) => plaintext,
            Err(e) => {
                error!(error = %e, "could not generate account credentials");
                return Err(e);
            }
        };

        // Single flushed write; the id and stored hash are available
        // to the completion step immediately.
        let account = self.account_repo.add(draft).await?;
        info!(
            account_id = %account.id,
            username = %account.username,
            "created disposable account"
        );

        match mode {
            CompletionMode::AutoLogin => {
                let session = self.activator.activate(&account, &plaintext).await?;
                Ok(CreationOutcome::LoggedIn { account, session })
            }
            CompletionMode::DisplayCredentials => {
                let confirmation_html = render_confirmation(&account.username, &plaintext);
                Ok(CreationOutcome::CredentialsIssued {
                    account,
                    confirmation_html,
                })
            }
        }
    }

    /// Fill in generated credentials and configured policy. Touches
    /// disjoint fields, persists nothing, and returns the plaintext
    /// password for the completion step.
    async fn enrich(&self, draft: &mut AccountDraft) -> GuestpassResult<String> {
        self.generator.generate_username(draft).await?;
        let plaintext = self.generator.generate_password(draft)?;

        self.apply_storage_folder(draft);
        self.apply_groups(draft).await?;

        Ok(plaintext)
    }

    fn apply_storage_folder(&self, draft: &mut AccountDraft) {
        if let Some(raw) = &self.settings.system_folder_for_new_users
            && let Ok(folder) = raw.trim().parse::<i64>()
        {
            draft.storage_folder = Some(folder);
        }
        // Non-numeric or absent settings leave the draft's default.
    }

    async fn apply_groups(&self, draft: &mut AccountDraft) -> GuestpassResult<()> {
        let Some(raw) = &self.settings.groups_for_new_users else {
            return Ok(());
        };

        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Ok(id) = Uuid::parse_str(entry) else {
                debug!(entry, "skipping malformed group id in settings");
                continue;
            };
            match self.group_repo.find_by_id(id).await {
                Ok(group) => {
                    draft.group_ids.insert(group.id);
                }
                // Unknown groups are skipped, not an error.
                Err(GuestpassError::NotFound { .. }) => {
                    debug!(group_id = %id, "skipping unknown group id in settings");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// Render the one-time confirmation shown by the deferred-login
/// variant. This is the only place the plaintext password is ever
/// disclosed.
fn render_confirmation(username: &str, plaintext_password: &str) -> String {
    format!(
        "<p>Your one-time account has been created.</p>\n\
         <p>Username: <strong>{}</strong><br>\
         Password: <strong>{}</strong></p>",
        escape_html(username),
        escape_html(plaintext_password),
    )
}
